use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DictionaryError;
use crate::fallback::FallbackTable;
use crate::selector::RandomSelector;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameWord {
    pub word: String,
    pub language: String,
}

/// Lookup capability of the external word dictionary.
pub trait WordDictionary {
    fn list_words_by_language(
        &self,
        language: &str,
    ) -> impl Future<Output = Result<Vec<GameWord>, DictionaryError>> + Send;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    NoWords,
    Unavailable { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum WordSource {
    Custom,
    Dictionary,
    Fallback { reason: FallbackReason },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPick {
    pub word: String,
    pub source: WordSource,
}

impl WordPick {
    /// UIに「予備ワードを使用中」と知らせるべきか
    pub fn used_fallback(&self) -> bool {
        matches!(self.source, WordSource::Fallback { .. })
    }
}

/// Supplies the secret word of a round: custom list first, then the
/// dictionary, then the built-in fallback table. Never fails.
#[derive(Debug, Clone)]
pub struct WordProvider<D> {
    dictionary: D,
    fallback: FallbackTable,
    timeout: Duration,
}

impl<D: WordDictionary> WordProvider<D> {
    pub fn new(dictionary: D) -> Self {
        Self {
            dictionary,
            fallback: FallbackTable::builtin(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackTable) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn fallback(&self) -> &FallbackTable {
        &self.fallback
    }

    pub async fn get_word<R: Rng + Send>(
        &self,
        language: &str,
        custom_words: &BTreeSet<String>,
        selector: &mut RandomSelector<R>,
    ) -> WordPick {
        // 1. カスタムワード（履歴なし、重複可）
        if let Some(word) = selector
            .pick_index(custom_words.len())
            .and_then(|i| custom_words.iter().nth(i))
        {
            return WordPick {
                word: word.clone(),
                source: WordSource::Custom,
            };
        }

        // 2. 辞書
        let reason = match self.lookup(language).await {
            Ok(words) => match selector.choose(&words) {
                Some(word) => {
                    return WordPick {
                        word: word.clone(),
                        source: WordSource::Dictionary,
                    }
                }
                None => FallbackReason::NoWords,
            },
            Err(e) => {
                tracing::warn!("dictionary lookup for {:?} failed: {}", language, e);
                FallbackReason::Unavailable {
                    message: e.to_string(),
                }
            }
        };

        // 3. 予備リスト
        tracing::info!("using fallback word list for {:?} ({:?})", language, reason);
        let word = selector
            .choose(self.fallback.words_for(language))
            .cloned()
            .unwrap_or_default();
        WordPick {
            word,
            source: WordSource::Fallback { reason },
        }
    }

    async fn lookup(&self, language: &str) -> Result<Vec<String>, DictionaryError> {
        let words = tokio::time::timeout(
            self.timeout,
            self.dictionary.list_words_by_language(language),
        )
        .await
        .map_err(|_| DictionaryError::Timeout(self.timeout))??;

        Ok(words
            .into_iter()
            .map(|w| w.word.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect())
    }
}
