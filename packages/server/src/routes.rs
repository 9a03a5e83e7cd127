use crate::state::AppState;
use axum::Router;

mod language;
mod session;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api/session", session::routes(state.clone()))
        .nest("/api/languages", language::routes(state.clone()))
}
