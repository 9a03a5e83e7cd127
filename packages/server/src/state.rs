use impostor_core::{FallbackTable, WordProvider};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, Mutex};

use crate::models::{notification::Notification, session::GameSession};
use crate::services::dictionary::DictionaryBackend;
use crate::utils::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<Mutex<HashMap<String, GameSession>>>,
    pub channel: Arc<Mutex<HashMap<String, broadcast::Sender<String>>>>,
    pub word_provider: Arc<WordProvider<DictionaryBackend>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        let word_provider = WordProvider::new(DictionaryBackend::from_config(&config))
            .with_fallback(load_fallback_table(&config))
            .with_timeout(config.dictionary_timeout);

        AppState {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            channel: Arc::new(Mutex::new(HashMap::new())),
            word_provider: Arc::new(word_provider),
            config: Arc::new(config),
        }
    }

    /// セッション作成時にだけ呼ぶ。以降は `subscribe` / `broadcast_notification` で参照のみ。
    pub async fn create_session_channel(&self, session_id: &str) {
        let (tx, _) = broadcast::channel(100);
        self.channel.lock().await.insert(session_id.to_string(), tx);
    }

    /// 存在しない（終了済みの）セッションには `None`
    pub async fn subscribe(&self, session_id: &str) -> Option<broadcast::Receiver<String>> {
        self.channel
            .lock()
            .await
            .get(session_id)
            .map(broadcast::Sender::subscribe)
    }

    pub async fn remove_session_channel(&self, session_id: &str) {
        self.channel.lock().await.remove(session_id);
    }

    pub async fn broadcast_notification(
        &self,
        session_id: &str,
        notification: &Notification,
    ) -> Result<(), String> {
        let Some(tx) = self.channel.lock().await.get(session_id).cloned() else {
            tracing::debug!("Session {} has no channel, notification dropped", session_id);
            return Ok(());
        };

        let message_text = serde_json::to_string(notification)
            .map_err(|e| format!("Failed to serialize notification: {}", e))?;

        // 購読者がいない場合は何もしない
        if tx.send(message_text).is_err() {
            tracing::debug!("No subscribers for session {}", session_id);
        }

        Ok(())
    }
}

fn load_fallback_table(config: &Config) -> FallbackTable {
    let Some(path) = &config.fallback_words_path else {
        return FallbackTable::builtin();
    };

    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| {
            FallbackTable::from_json(&config.default_language, &json).map_err(|e| e.to_string())
        });

    match loaded {
        Ok(table) => {
            tracing::info!("Loaded fallback words from {}", path.display());
            table
        }
        Err(e) => {
            tracing::warn!(
                "予備ワードファイル {} を読み込めませんでした（組み込みリストを使用）: {}",
                path.display(),
                e
            );
            FallbackTable::builtin()
        }
    }
}
