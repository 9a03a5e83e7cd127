use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::info;

use crate::state::AppState;

pub async fn handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    // チャンネルはセッションと同時に作られ、終了時に消える
    let Some(rx) = state.subscribe(&session_id).await else {
        return (StatusCode::NOT_FOUND, "Session not found").into_response();
    };
    ws.on_upgrade(move |socket| handle_socket(socket, rx, session_id))
}

/// セッションの通知をクライアントへ流す。クライアントからのテキストは無視する。
pub async fn handle_socket(
    ws: WebSocket,
    mut rx: broadcast::Receiver<String>,
    session_id: String,
) {
    info!("New WebSocket connection established for session: {}", session_id);

    let (mut sender, mut receiver) = ws.split();

    let session_id_for_send = session_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(text) => {
                    if let Err(e) = sender.send(Message::Text(text)).await {
                        tracing::debug!("Error sending message: {}", e);
                        break;
                    }
                }
                // 遅れた購読者は取りこぼした分を飛ばして続行
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        "WebSocket subscriber in session {} skipped {} notification(s)",
                        session_id_for_send,
                        skipped
                    );
                }
                // セッション終了でチャンネルが閉じられた
                Err(RecvError::Closed) => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }
    info!("WebSocket connection closed for session: {}", session_id);
}
