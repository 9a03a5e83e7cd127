use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use impostor_core::GameSetup;
use serde::Serialize;

use crate::{
    models::{api::ErrorResponse, session::CreateSessionResponse},
    services::session_service::{self, SessionServiceError},
    state::AppState,
    utils::websocket,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        // セッション作成（最初のラウンドまで準備する）
        // curl -X POST http://localhost:8080/api/session -H 'Content-Type: application/json' \
        //   -d '{"player_count": 4, "impostor_count": 1, "language": "en"}'
        .route("/", post(create_session))
        // セッション情報取得
        // curl http://localhost:8080/api/session/{sessionid}
        .route("/:sessionid", get(get_session))
        // 統計（DEBUG_SHOW_IMPOSTORS=true のときのみインポスターの組を含む）
        // curl http://localhost:8080/api/session/{sessionid}/stats
        .route("/:sessionid/stats", get(get_stats))
        // 端末を持っているプレイヤーのカード
        // curl http://localhost:8080/api/session/{sessionid}/reveal
        .route("/:sessionid/reveal", get(reveal_current))
        // 次のプレイヤーへ
        // curl -X POST http://localhost:8080/api/session/{sessionid}/reveal/next
        .route("/:sessionid/reveal/next", post(advance_reveal))
        // 議論開始
        // curl -X POST http://localhost:8080/api/session/{sessionid}/discussion
        .route("/:sessionid/discussion", post(start_discussion))
        // 同じメンバーで次のラウンド
        // curl -X POST http://localhost:8080/api/session/{sessionid}/restart
        .route("/:sessionid/restart", post(restart_round))
        // セッション終了
        // curl -X POST http://localhost:8080/api/session/{sessionid}/end
        .route("/:sessionid/end", post(end_session))
        // 議論タイマー
        // curl http://localhost:8080/api/session/{sessionid}/timer
        .route("/:sessionid/timer", get(timer_status))
        .route("/:sessionid/timer/start", post(start_timer))
        .route("/:sessionid/timer/pause", post(pause_timer))
        .route("/:sessionid/timer/reset", post(reset_timer))
        // WebSocket接続（通知の購読）
        // websocat ws://localhost:8080/api/session/{sessionid}/ws
        .route("/:sessionid/ws", get(websocket::handler))
        .with_state(state)
}

fn status_for(error: &SessionServiceError) -> StatusCode {
    match error {
        SessionServiceError::Configuration(_) => StatusCode::BAD_REQUEST,
        SessionServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        SessionServiceError::RoundPending
        | SessionServiceError::InvalidPhase(_)
        | SessionServiceError::Session(_) => StatusCode::CONFLICT,
        SessionServiceError::WordTask(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: Result<T, SessionServiceError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!("{}", e);
            } else {
                tracing::debug!("Request rejected: {}", e);
            }
            (
                status,
                Json(ErrorResponse {
                    success: false,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn create_session(
    State(state): State<AppState>,
    Json(setup): Json<GameSetup>,
) -> impl IntoResponse {
    let result = session_service::create_session(state, setup)
        .await
        .map(|view| CreateSessionResponse {
            session_id: view.session_id.clone(),
            view,
        });
    respond(result)
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::get_session_view(state, &session_id).await)
}

async fn get_stats(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::get_session_stats(state, &session_id).await)
}

async fn reveal_current(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::reveal_current(state, &session_id).await)
}

async fn advance_reveal(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::advance_reveal(state, &session_id).await)
}

async fn start_discussion(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::start_discussion(state, &session_id).await)
}

async fn restart_round(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::restart_round(state, &session_id).await)
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(
        session_service::end_session(state, &session_id)
            .await
            .map(|_| "Session ended"),
    )
}

async fn timer_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::get_timer_status(state, &session_id).await)
}

async fn start_timer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::start_timer(state, &session_id).await)
}

async fn pause_timer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::pause_timer(state, &session_id).await)
}

async fn reset_timer(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    respond(session_service::reset_timer(state, &session_id).await)
}
