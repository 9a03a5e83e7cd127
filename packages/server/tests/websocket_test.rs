use std::time::Duration;

use futures::StreamExt;
use impostor_core::GameSetup;
use impostor_server::{
    app,
    models::{notification::Notification, session::GamePhase},
    services::session_service,
    state::AppState,
    utils::test_setup::{offline_config, setup_test_env},
};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// 実際にポートをバインドしてサーバーを起動する
async fn spawn_server() -> (String, AppState) {
    setup_test_env();
    let state = AppState::with_config(offline_config());
    let app = app::create_app_with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr.to_string(), state)
}

async fn create_session(state: &AppState) -> String {
    session_service::create_session(
        state.clone(),
        GameSetup {
            player_count: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .session_id
}

#[tokio::test]
async fn test_websocket_receives_session_notifications() {
    let (addr, state) = spawn_server().await;
    let session_id = create_session(&state).await;

    let url = format!("ws://{}/api/session/{}/ws", addr, session_id);
    // 購読はアップグレード前に済むので、接続後すぐの通知も届く
    let (mut socket, _) = connect_async(url).await.unwrap();

    for _ in 0..3 {
        session_service::advance_reveal(state.clone(), &session_id)
            .await
            .unwrap();
    }
    session_service::end_session(state.clone(), &session_id)
        .await
        .unwrap();

    let mut received = Vec::new();
    while let Ok(Some(Ok(message))) =
        tokio::time::timeout(Duration::from_secs(5), socket.next()).await
    {
        match message {
            Message::Text(text) => {
                received.push(serde_json::from_str::<Notification>(&text).unwrap())
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    assert_eq!(received.len(), 2);
    match &received[0] {
        Notification::PhaseChange {
            from_phase,
            to_phase,
            ..
        } => {
            assert_eq!(*from_phase, GamePhase::Reveal);
            assert_eq!(*to_phase, GamePhase::AllRevealed);
        }
        other => panic!("unexpected notification: {:?}", other),
    }
    assert!(matches!(received[1], Notification::SessionEnded { .. }));
}

#[tokio::test]
async fn test_websocket_rejects_unknown_session() {
    let (addr, _state) = spawn_server().await;

    let url = format!("ws://{}/api/session/no-such-session/ws", addr);
    assert!(connect_async(url).await.is_err());
}
