use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use impostor_server::{
    app,
    models::{
        api::{ErrorResponse, LanguagesResponse},
        session::{CreateSessionResponse, GamePhase, RevealCard, SessionStats, SessionView},
    },
    state::AppState,
    utils::{
        config::Config,
        test_setup::{offline_config, setup_test_env},
    },
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

fn test_app() -> Router {
    setup_test_env();
    app::create_app_with_state(AppState::with_config(offline_config()))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

async fn create_session(app: &Router, setup: serde_json::Value) -> CreateSessionResponse {
    let (status, body) = send(app, "POST", "/api/session", Some(setup)).await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&body));
    parse(&body)
}

#[tokio::test]
async fn test_create_session() {
    let app = test_app();

    let created = create_session(
        &app,
        json!({ "player_names": ["Ana", "", "Joan"], "player_count": 4, "language": "en" }),
    )
    .await;

    let view = created.view;
    assert_eq!(view.session_id, created.session_id);
    assert_eq!(view.phase, GamePhase::Reveal);
    assert_eq!(view.games_played_count, 1);
    assert_eq!(view.language, "en");
    assert_eq!(view.players.len(), 4);
    assert_eq!(view.players[1].name, "Player 2");
    // 辞書なし・カスタムワードなしなので予備リストから
    assert!(view.fallback_word_used);
}

#[tokio::test]
async fn test_create_session_rejects_invalid_setup() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/session",
        Some(json!({ "player_count": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = parse(&body);
    assert!(!error.success);

    let (status, _) = send(
        &app,
        "POST",
        "/api/session",
        Some(json!({ "player_count": 4, "impostor_count": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/session",
        Some(json!({ "player_count": 13 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reveal_flow_with_custom_words() {
    let app = test_app();
    let created = create_session(
        &app,
        json!({ "player_count": 3, "custom_words": "Car, Car ,", "impostor_count": 1 }),
    )
    .await;
    let id = created.session_id;
    assert!(!created.view.fallback_word_used);

    let mut impostors = 0;
    for index in 0..3 {
        let (status, body) = send(&app, "GET", &format!("/api/session/{}/reveal", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let card: RevealCard = parse(&body);
        assert_eq!(card.player_index, index);
        if card.is_impostor {
            impostors += 1;
            assert_eq!(card.secret_word, None);
        } else {
            assert_eq!(card.secret_word.as_deref(), Some("Car"));
        }

        let (status, body) =
            send(&app, "POST", &format!("/api/session/{}/reveal/next", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let view: SessionView = parse(&body);
        let expected = if index == 2 {
            GamePhase::AllRevealed
        } else {
            GamePhase::Reveal
        };
        assert_eq!(view.phase, expected);
    }
    assert_eq!(impostors, 1);

    // 全員確認後はカードを見られない
    let (status, _) = send(&app, "GET", &format!("/api/session/{}/reveal", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) =
        send(&app, "POST", &format!("/api/session/{}/discussion", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let view: SessionView = parse(&body);
    assert_eq!(view.phase, GamePhase::Discussion);
}

#[tokio::test]
async fn test_discussion_requires_all_revealed() {
    let app = test_app();
    let id = create_session(&app, json!({ "player_count": 4 }))
        .await
        .session_id;

    let (status, body) =
        send(&app, "POST", &format!("/api/session/{}/discussion", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let error: ErrorResponse = parse(&body);
    assert!(error.error.contains("Reveal"));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/session/{}/timer/start", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_restart_counts_games_and_changes_impostor() {
    setup_test_env();
    let config = Config {
        show_impostors: true,
        ..offline_config()
    };
    let app = app::create_app_with_state(AppState::with_config(config));
    let id = create_session(&app, json!({ "player_count": 4, "impostor_count": 1 }))
        .await
        .session_id;

    for expected_games in 2..=4u32 {
        let (status, body) =
            send(&app, "POST", &format!("/api/session/{}/restart", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let view: SessionView = parse(&body);
        assert_eq!(view.phase, GamePhase::Reveal);
        assert_eq!(view.current_player_index, 0);
        assert_eq!(view.games_played_count, expected_games);

        let (status, body) = send(&app, "GET", &format!("/api/session/{}/stats", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let stats: SessionStats = parse(&body);
        let last = stats.last_impostor_indices.unwrap();
        let current = stats.current_impostor_indices.unwrap();
        assert_eq!(current.len(), 1);
        assert!(last.is_disjoint(&current));
    }

    // 5ゲーム目は特別ラウンド
    let (_, body) = send(&app, "POST", &format!("/api/session/{}/restart", id), None).await;
    let view: SessionView = parse(&body);
    assert_eq!(view.games_played_count, 5);
    assert!(view.special_round);
}

#[tokio::test]
async fn test_stats_hide_impostors_without_debug_flag() {
    let app = test_app();
    let id = create_session(&app, json!({ "player_count": 5 }))
        .await
        .session_id;

    let (status, body) = send(&app, "GET", &format!("/api/session/{}/stats", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = parse(&body);
    assert_eq!(json["games_played_count"], 1);
    assert_eq!(json["status"], "Active");
    assert!(json.get("current_impostor_indices").is_none());
}

#[tokio::test]
async fn test_end_session() {
    let app = test_app();
    let id = create_session(&app, json!({ "player_count": 3 }))
        .await
        .session_id;

    let (status, _) = send(&app, "POST", &format!("/api/session/{}/end", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &format!("/api/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "POST", &format!("/api/session/{}/restart", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/session/no-such-session", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ErrorResponse = parse(&body);
    assert!(error.error.contains("no-such-session"));
}

#[tokio::test]
async fn test_languages() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/api/languages", None).await;
    assert_eq!(status, StatusCode::OK);

    let languages: LanguagesResponse = parse(&body);
    assert_eq!(languages.supported.len(), 10);
    assert!(languages.supported.contains(&"ja".to_string()));
    assert_eq!(languages.baseline, "es");
    assert_eq!(languages.default, "es");
    assert!(!languages.dictionary_enabled);
}
