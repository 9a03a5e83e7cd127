use dotenvy::dotenv;
use std::sync::Once;

use super::config::Config;

static INIT: Once = Once::new();

/// テスト用の共通初期化（.env の読み込みとテスト向けロガー）
pub fn setup_test_env() {
    INIT.call_once(|| {
        dotenv().ok();
        // RUST_LOG=debug cargo test で tracing のログを確認できる
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    });
}

/// 外部辞書なしのテスト用設定。環境変数には依存しない。
pub fn offline_config() -> Config {
    Config {
        dictionary_url: None,
        dictionary_key: None,
        ..Config::default()
    }
}
