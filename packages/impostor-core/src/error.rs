use std::time::Duration;

use crate::session::SessionStatus;

/// ラウンドを開始できない設定エラー。割り当て前に呼び出し側へ返す。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("at least {min} players are required, got {count}")]
    TooFewPlayers { count: usize, min: usize },
    #[error("at most {max} players are supported, got {count}")]
    TooManyPlayers { count: usize, max: usize },
    #[error("at least one impostor is required")]
    NoImpostors,
    #[error("impostor count {impostors} must be smaller than player count {players}")]
    TooManyImpostors { impostors: usize, players: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("session is not active (status: {0:?})")]
    NotActive(SessionStatus),
}

/// 辞書コラボレータからの失敗。WordProvider内でフォールバックに変換され、呼び出し側には届かない。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    #[error("dictionary is not configured")]
    Disabled,
    #[error("dictionary request failed: {0}")]
    RequestFailed(String),
    #[error("dictionary responded with status {0}")]
    Status(u16),
    #[error("dictionary response could not be decoded: {0}")]
    Decode(String),
    #[error("dictionary lookup timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, thiserror::Error)]
pub enum FallbackTableError {
    #[error("fallback table has no entry for baseline language {0:?}")]
    MissingBaseline(String),
    #[error("fallback list for language {0:?} is empty")]
    EmptyList(String),
    #[error("fallback table could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
