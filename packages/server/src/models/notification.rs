use impostor_core::FallbackReason;
use serde::{Deserialize, Serialize};

use super::session::GamePhase;

/// セッションのWebSocket購読者へ送る通知
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum Notification {
    PhaseChange {
        session_id: String,
        from_phase: GamePhase,
        to_phase: GamePhase,
        timestamp: String,
    },
    FallbackWordUsed {
        session_id: String,
        language: String,
        reason: FallbackReason,
        timestamp: String,
    },
    TimeUp {
        session_id: String,
        timestamp: String,
    },
    SessionEnded {
        session_id: String,
        timestamp: String,
    },
}

impl Notification {
    pub fn phase_change(session_id: &str, from_phase: GamePhase, to_phase: GamePhase) -> Self {
        Notification::PhaseChange {
            session_id: session_id.to_string(),
            from_phase,
            to_phase,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn fallback_word_used(session_id: &str, language: &str, reason: FallbackReason) -> Self {
        Notification::FallbackWordUsed {
            session_id: session_id.to_string(),
            language: language.to_string(),
            reason,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn time_up(session_id: &str) -> Self {
        Notification::TimeUp {
            session_id: session_id.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn session_ended(session_id: &str) -> Self {
        Notification::SessionEnded {
            session_id: session_id.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_tag() {
        let json = serde_json::to_value(Notification::time_up("abc")).unwrap();
        assert_eq!(json["message_type"], "time_up");
        assert_eq!(json["session_id"], "abc");

        let json = serde_json::to_value(Notification::fallback_word_used(
            "abc",
            "fr",
            FallbackReason::NoWords,
        ))
        .unwrap();
        assert_eq!(json["message_type"], "fallback_word_used");
        assert_eq!(json["reason"]["kind"], "no_words");
    }
}
