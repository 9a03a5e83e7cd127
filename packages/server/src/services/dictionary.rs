use impostor_core::{DictionaryError, GameWord, WordDictionary};
use reqwest::Client;

use crate::utils::config::Config;

/// Supabase互換のREST APIで `game_words` テーブルを引く辞書クライアント
#[derive(Clone, Debug)]
pub struct RemoteDictionary {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteDictionary {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub async fn fetch_words(&self, language: &str) -> Result<Vec<GameWord>, DictionaryError> {
        let url = format!("{}/rest/v1/game_words", self.base_url);

        let mut request = self.client.get(&url).query(&[
            ("language", format!("eq.{}", language)),
            ("select", "word,language".to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DictionaryError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DictionaryError::Status(response.status().as_u16()));
        }

        response
            .json::<Vec<GameWord>>()
            .await
            .map_err(|e| DictionaryError::Decode(e.to_string()))
    }
}

#[derive(Clone, Debug)]
pub enum DictionaryBackend {
    Disabled,
    Remote(RemoteDictionary),
}

impl DictionaryBackend {
    pub fn from_config(config: &Config) -> Self {
        match &config.dictionary_url {
            Some(url) => {
                tracing::info!("Remote dictionary enabled ({})", url);
                DictionaryBackend::Remote(RemoteDictionary::new(
                    url.clone(),
                    config.dictionary_key.clone(),
                ))
            }
            None => DictionaryBackend::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, DictionaryBackend::Disabled)
    }
}

impl WordDictionary for DictionaryBackend {
    async fn list_words_by_language(
        &self,
        language: &str,
    ) -> Result<Vec<GameWord>, DictionaryError> {
        match self {
            DictionaryBackend::Disabled => Err(DictionaryError::Disabled),
            DictionaryBackend::Remote(remote) => remote.fetch_words(language).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_setup::offline_config;

    #[tokio::test]
    async fn test_disabled_backend_fails_lookup() {
        let backend = DictionaryBackend::from_config(&offline_config());
        assert!(!backend.is_enabled());
        assert_eq!(
            backend.list_words_by_language("es").await,
            Err(DictionaryError::Disabled)
        );
    }

    #[test]
    fn test_remote_backend_from_config() {
        let config = Config {
            dictionary_url: Some("http://localhost:54321/".to_string()),
            ..offline_config()
        };
        match DictionaryBackend::from_config(&config) {
            DictionaryBackend::Remote(remote) => {
                assert_eq!(remote.base_url, "http://localhost:54321")
            }
            DictionaryBackend::Disabled => panic!("expected remote backend"),
        }
    }
}
