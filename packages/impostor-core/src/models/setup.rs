use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{config::GameConfig, player::Player};
use crate::error::ConfigurationError;

pub const MAX_PLAYERS: usize = 12;

/// カスタムワードはリストでもカンマ区切りの文字列でも受け付ける
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomWords {
    List(Vec<String>),
    CommaSeparated(String),
}

impl Default for CustomWords {
    fn default() -> Self {
        CustomWords::List(Vec::new())
    }
}

impl CustomWords {
    pub fn to_set(&self) -> BTreeSet<String> {
        let entries: Vec<&str> = match self {
            CustomWords::List(words) => words.iter().map(String::as_str).collect(),
            CustomWords::CommaSeparated(text) => text.split(',').collect(),
        };
        entries
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Raw form submitted by the setup screen.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameSetup {
    #[serde(default)]
    pub player_names: Vec<String>,
    #[serde(default)]
    pub player_count: Option<usize>,
    #[serde(default = "default_impostor_count")]
    pub impostor_count: usize,
    #[serde(default)]
    pub custom_words: CustomWords,
    #[serde(default)]
    pub language: Option<String>,
}

fn default_impostor_count() -> usize {
    1
}

impl GameSetup {
    pub fn into_config(self) -> Result<GameConfig, ConfigurationError> {
        let count = self.player_count.unwrap_or(self.player_names.len());
        if count > MAX_PLAYERS {
            return Err(ConfigurationError::TooManyPlayers {
                count,
                max: MAX_PLAYERS,
            });
        }

        // 空欄の名前は "Player N" で埋める
        let players = (0..count)
            .map(|i| {
                let name = self
                    .player_names
                    .get(i)
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Player {}", i + 1));
                Player::new(i as u32, name)
            })
            .collect();

        GameConfig::new(players, self.impostor_count, self.custom_words.to_set())
    }
}
