use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 特殊ラウンドの周期。`games_played_count` がこの倍数のとき再選出制限を外す。
pub const SPECIAL_ROUND_INTERVAL: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    Uninitialized,
    Active,
    Ended,
}

/// Per-session memory used by the role assignment engine.
///
/// Counters are only moved forward by [`crate::RoleAssignmentEngine`]; callers
/// get read-only accessors plus the explicit [`reset`](Self::reset) and
/// [`end`](Self::end) lifecycle transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    status: SessionStatus,
    games_played_count: u32,
    last_impostor_indices: BTreeSet<usize>,
    current_impostor_indices: BTreeSet<usize>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいセットアップ。これまでの履歴に関係なく初期値に戻す。
    pub fn reset(&mut self) {
        self.status = SessionStatus::Active;
        self.games_played_count = 1;
        self.last_impostor_indices.clear();
        self.current_impostor_indices.clear();
    }

    /// セッション終了。カウンタと履歴は破棄される。
    pub fn end(&mut self) {
        self.status = SessionStatus::Ended;
        self.games_played_count = 0;
        self.last_impostor_indices.clear();
        self.current_impostor_indices.clear();
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn games_played_count(&self) -> u32 {
        self.games_played_count
    }

    pub fn last_impostor_indices(&self) -> &BTreeSet<usize> {
        &self.last_impostor_indices
    }

    pub fn current_impostor_indices(&self) -> &BTreeSet<usize> {
        &self.current_impostor_indices
    }

    pub fn is_special_round(&self) -> bool {
        self.games_played_count > 0 && self.games_played_count % SPECIAL_ROUND_INTERVAL == 0
    }

    // 再開時: 直前ラウンドの組をスナップショットしてカウンタを進める
    pub(crate) fn begin_restart(&mut self) {
        self.last_impostor_indices = std::mem::take(&mut self.current_impostor_indices);
        self.games_played_count += 1;
    }

    pub(crate) fn set_current_impostors(&mut self, indices: BTreeSet<usize>) {
        self.current_impostor_indices = indices;
    }
}
