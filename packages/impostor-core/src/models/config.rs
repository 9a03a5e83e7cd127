use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::player::Player;
use crate::error::ConfigurationError;

pub const MIN_PLAYERS: usize = 3;

/// Immutable per-session configuration. Constructed only through
/// [`GameConfig::new`] (or deserialization, which runs the same checks), so a
/// value of this type always satisfies `1 <= impostor_count < players.len()`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    players: Vec<Player>,
    impostor_count: usize,
    custom_words: BTreeSet<String>,
}

#[derive(Deserialize)]
struct RawGameConfig {
    players: Vec<Player>,
    impostor_count: usize,
    #[serde(default)]
    custom_words: BTreeSet<String>,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigurationError;

    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        GameConfig::new(raw.players, raw.impostor_count, raw.custom_words)
    }
}

impl GameConfig {
    pub fn new(
        players: Vec<Player>,
        impostor_count: usize,
        custom_words: BTreeSet<String>,
    ) -> Result<Self, ConfigurationError> {
        let config = Self {
            players,
            impostor_count,
            custom_words,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let count = self.players.len();
        if count < MIN_PLAYERS {
            return Err(ConfigurationError::TooFewPlayers {
                count,
                min: MIN_PLAYERS,
            });
        }
        if self.impostor_count < 1 {
            return Err(ConfigurationError::NoImpostors);
        }
        if self.impostor_count >= count {
            return Err(ConfigurationError::TooManyImpostors {
                impostors: self.impostor_count,
                players: count,
            });
        }
        Ok(())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    pub fn custom_words(&self) -> &BTreeSet<String> {
        &self.custom_words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: u32) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, format!("Player {}", i + 1))).collect()
    }

    #[test]
    fn test_valid_config() {
        let config = GameConfig::new(players(4), 1, BTreeSet::new()).unwrap();
        assert_eq!(config.player_count(), 4);
        assert_eq!(config.impostor_count(), 1);
    }

    #[test]
    fn test_rejects_too_few_players() {
        assert_eq!(
            GameConfig::new(players(2), 1, BTreeSet::new()),
            Err(ConfigurationError::TooFewPlayers { count: 2, min: 3 })
        );
    }

    #[test]
    fn test_rejects_zero_impostors() {
        assert_eq!(
            GameConfig::new(players(5), 0, BTreeSet::new()),
            Err(ConfigurationError::NoImpostors)
        );
    }

    #[test]
    fn test_rejects_impostors_not_fewer_than_players() {
        assert_eq!(
            GameConfig::new(players(3), 3, BTreeSet::new()),
            Err(ConfigurationError::TooManyImpostors {
                impostors: 3,
                players: 3
            })
        );
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let json = r#"{"players":[{"id":0,"name":"a"},{"id":1,"name":"b"},{"id":2,"name":"c"}],"impostor_count":2}"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert!(config.custom_words().is_empty());

        let invalid = r#"{"players":[{"id":0,"name":"a"},{"id":1,"name":"b"},{"id":2,"name":"c"}],"impostor_count":3}"#;
        assert!(serde_json::from_str::<GameConfig>(invalid).is_err());
    }
}
