use impostor_core::{is_supported_language, BASELINE_LANGUAGE, DEFAULT_LOOKUP_TIMEOUT};
use once_cell::sync::Lazy;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_DISCUSSION_MINUTES: u64 = 5;
const DEFAULT_SESSION_TTL_MINUTES: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub allowed_origin: String,
    // 未設定なら辞書は無効（カスタムワードか予備リストのみ）
    pub dictionary_url: Option<String>,
    pub dictionary_key: Option<String>,
    pub dictionary_timeout: Duration,
    pub discussion_duration: Duration,
    // この時間操作のないセッションは破棄する
    pub session_ttl: Duration,
    pub default_language: String,
    pub fallback_words_path: Option<PathBuf>,
    // 統計APIでインポスターの組を表示するかどうか
    pub show_impostors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            dictionary_url: None,
            dictionary_key: None,
            dictionary_timeout: DEFAULT_LOOKUP_TIMEOUT,
            discussion_duration: Duration::from_secs(DEFAULT_DISCUSSION_MINUTES * 60),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_MINUTES * 60),
            default_language: BASELINE_LANGUAGE.to_string(),
            fallback_words_path: None,
            show_impostors: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 変数名から値を引く関数で設定を組み立てる。不正な値はデフォルトに戻す。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&n| n > 0)
        };

        let server_addr = lookup("SERVER_ADDR")
            .and_then(|v| v.parse::<SocketAddr>().ok())
            .unwrap_or(defaults.server_addr);
        let allowed_origin = non_empty("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin);
        let dictionary_timeout = positive("DICTIONARY_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.dictionary_timeout);
        let discussion_duration = positive("DISCUSSION_MINUTES")
            .map(|m| Duration::from_secs(m * 60))
            .unwrap_or(defaults.discussion_duration);
        let session_ttl = positive("SESSION_TTL_MINUTES")
            .map(|m| Duration::from_secs(m * 60))
            .unwrap_or(defaults.session_ttl);
        let default_language = lookup("DEFAULT_LANGUAGE")
            .map(|v| v.trim().to_lowercase())
            .filter(|v| is_supported_language(v))
            .unwrap_or(defaults.default_language);
        let show_impostors = lookup("DEBUG_SHOW_IMPOSTORS")
            .map(|v| v.trim() == "true")
            .unwrap_or(false);

        Self {
            server_addr,
            allowed_origin,
            dictionary_url: non_empty("DICTIONARY_URL"),
            dictionary_key: non_empty("DICTIONARY_KEY"),
            dictionary_timeout,
            discussion_duration,
            session_ttl,
            default_language,
            fallback_words_path: non_empty("FALLBACK_WORDS_PATH").map(PathBuf::from),
            show_impostors,
        }
    }

    /// リクエストの言語コードを解決する。未対応・未指定ならデフォルト言語。
    pub fn resolve_language(&self, requested: Option<&str>) -> String {
        requested
            .map(|l| l.trim().to_lowercase())
            .filter(|l| is_supported_language(l))
            .unwrap_or_else(|| self.default_language.clone())
    }
}
