use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::words::{WordPick, WordSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Crew,     // お題を知っている
    Impostor, // お題を知らない
}

/// One round's hidden information. A restart builds a new value instead of
/// mutating the previous one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAssignment {
    pub impostor_indices: BTreeSet<usize>,
    pub secret_word: String,
    pub word_source: WordSource,
}

impl RoundAssignment {
    pub fn new(impostor_indices: BTreeSet<usize>, pick: WordPick) -> Self {
        Self {
            impostor_indices,
            secret_word: pick.word,
            word_source: pick.source,
        }
    }

    pub fn is_impostor(&self, player_index: usize) -> bool {
        self.impostor_indices.contains(&player_index)
    }

    pub fn role_of(&self, player_index: usize) -> Role {
        if self.is_impostor(player_index) {
            Role::Impostor
        } else {
            Role::Crew
        }
    }

    /// インポスターには `None` を返す
    pub fn word_for(&self, player_index: usize) -> Option<&str> {
        match self.role_of(player_index) {
            Role::Crew => Some(&self.secret_word),
            Role::Impostor => None,
        }
    }
}
