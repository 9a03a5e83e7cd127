use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub supported: Vec<String>,
    pub baseline: String,
    pub default: String,
    // false なら予備リストかカスタムワードのみ
    pub dictionary_enabled: bool,
}
