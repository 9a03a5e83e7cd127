use anyhow::Context;
use axum::http::{self, HeaderValue, Method};
use dotenvy::dotenv;
use env_logger::Builder;
use log::LevelFilter;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use impostor_server::{
    app, services::session_service, state::AppState, utils::config::CONFIG,
};

// ログ設定（RUST_LOG があればそちらを優先）
fn init_logger() {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("tower_http", LevelFilter::Debug)
        .filter_module("axum", LevelFilter::Debug)
        .format_timestamp(Some(env_logger::TimestampPrecision::Millis))
        .format_target(true);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 環境変数をロード
    if let Err(e) = dotenv() {
        eprintln!("Warning: .envファイルの読み込みに失敗しました: {}", e);
    }

    init_logger(); // ロガーの初期化

    let config = CONFIG.clone();
    if config.dictionary_url.is_none() {
        log::warn!("環境変数 DICTIONARY_URL が設定されていません（予備ワードリストのみ使用）");
    }

    // CORSレイヤーの設定
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("ALLOWED_ORIGIN が不正です: {}", config.allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin([origin])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]);

    // ルーティングの設定
    let state = AppState::with_config(config.clone());
    // 放置されたセッションの掃除
    session_service::spawn_session_reaper(state.clone());
    let app = app::create_app_with_state(state)
        .layer(cors) // CORSレイヤーを追加
        .layer(
            TraceLayer::new_for_http() // HTTPトレースログを有効化
                .make_span_with(|request: &http::Request<_>| {
                    tracing::info_span!(
                        "HTTP request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                }),
        );

    // サーバーの起動
    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("{} にバインドできませんでした", config.server_addr))?;

    log::info!("サーバーを起動しました: http://{}", config.server_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
