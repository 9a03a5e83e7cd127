use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use impostor_core::SUPPORTED_LANGUAGES;

use crate::{models::api::LanguagesResponse, state::AppState};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // 対応言語一覧
        // curl http://localhost:8080/api/languages
        .route("/", get(get_languages))
        .with_state(state)
}

async fn get_languages(State(state): State<AppState>) -> impl IntoResponse {
    let response = LanguagesResponse {
        supported: SUPPORTED_LANGUAGES.iter().map(|l| l.to_string()).collect(),
        baseline: state.word_provider.fallback().baseline().to_string(),
        default: state.config.default_language.clone(),
        dictionary_enabled: state.word_provider.dictionary().is_enabled(),
    };
    (StatusCode::OK, Json(response))
}
