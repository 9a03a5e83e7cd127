use chrono::{DateTime, Utc};
use impostor_core::{
    GameConfig, Player, RoleAssignmentEngine, RoundAssignment, SessionState, SessionStatus,
    WordSource,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use super::timer::DiscussionTimer;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Loading,     // ワード取得中
    Reveal,      // 1人ずつ端末を回して役職を確認
    AllRevealed, // 全員確認済み
    Discussion,  // 議論フェーズ
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Loading => write!(f, "Loading"),
            GamePhase::Reveal => write!(f, "Reveal"),
            GamePhase::AllRevealed => write!(f, "AllRevealed"),
            GamePhase::Discussion => write!(f, "Discussion"),
        }
    }
}

/// One play session on one device: setup, then rounds until the players end it.
#[derive(Debug)]
pub struct GameSession {
    pub session_id: String,
    pub config: GameConfig,
    pub language: String,
    pub state: SessionState,
    pub engine: RoleAssignmentEngine,
    pub round: Option<RoundAssignment>,
    pub phase: GamePhase,
    pub current_player_index: usize,
    pub timer: DiscussionTimer,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl GameSession {
    pub fn new(
        session_id: String,
        config: GameConfig,
        language: String,
        discussion_duration: Duration,
    ) -> Self {
        GameSession {
            session_id,
            config,
            language,
            state: SessionState::new(),
            engine: RoleAssignmentEngine::default(),
            round: None,
            phase: GamePhase::Loading,
            current_player_index: 0,
            timer: DiscussionTimer::new(discussion_duration),
            created_at: Utc::now(),
            last_activity: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// 最後の操作から `ttl` 以上経過しているか
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_activity)
            .to_std()
            .map(|idle| idle >= ttl)
            .unwrap_or(false)
    }

    /// 次のラウンドの準備に入る。前ラウンドの割り当ては破棄される。
    pub fn begin_loading(&mut self) {
        self.round = None;
        self.phase = GamePhase::Loading;
        self.current_player_index = 0;
        self.timer.reset();
    }

    pub fn start_round(&mut self, round: RoundAssignment) {
        self.round = Some(round);
        self.phase = GamePhase::Reveal;
        self.current_player_index = 0;
    }

    pub fn reveal_card(&self) -> Option<RevealCard> {
        let round = self.round.as_ref()?;
        let player = self.config.players().get(self.current_player_index)?;
        Some(RevealCard {
            player_index: self.current_player_index,
            player: player.clone(),
            is_impostor: round.is_impostor(self.current_player_index),
            secret_word: round
                .word_for(self.current_player_index)
                .map(str::to_string),
        })
    }

    /// 次のプレイヤーへ。最後のプレイヤーの後は `AllRevealed`。
    pub fn advance_reveal(&mut self) -> GamePhase {
        if self.current_player_index + 1 < self.config.player_count() {
            self.current_player_index += 1;
        } else {
            self.phase = GamePhase::AllRevealed;
        }
        self.phase
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            players: self.config.players().to_vec(),
            impostor_count: self.config.impostor_count(),
            language: self.language.clone(),
            phase: self.phase,
            current_player_index: self.current_player_index,
            games_played_count: self.state.games_played_count(),
            special_round: self.state.is_special_round(),
            fallback_word_used: self
                .round
                .as_ref()
                .map(|r| matches!(r.word_source, WordSource::Fallback { .. }))
                .unwrap_or(false),
        }
    }

    pub fn stats(&self, show_impostors: bool) -> SessionStats {
        SessionStats {
            status: self.state.status(),
            games_played_count: self.state.games_played_count(),
            special_round: self.state.is_special_round(),
            last_impostor_indices: show_impostors
                .then(|| self.state.last_impostor_indices().clone()),
            current_impostor_indices: show_impostors
                .then(|| self.state.current_impostor_indices().clone()),
        }
    }
}

/// 端末を持っているプレイヤーにだけ見せる情報
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevealCard {
    pub player_index: usize,
    pub player: Player,
    pub is_impostor: bool,
    pub secret_word: Option<String>,
}

/// 秘密情報を含まないセッションの状態
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    pub session_id: String,
    pub players: Vec<Player>,
    pub impostor_count: usize,
    pub language: String,
    pub phase: GamePhase,
    pub current_player_index: usize,
    pub games_played_count: u32,
    pub special_round: bool,
    pub fallback_word_used: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStats {
    pub status: SessionStatus,
    pub games_played_count: u32,
    pub special_round: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_impostor_indices: Option<BTreeSet<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_impostor_indices: Option<BTreeSet<usize>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub view: SessionView,
}
