use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Countdown for the discussion phase.
///
/// Every start/pause/reset/finish bumps `generation`, so a watcher task spawned for
/// an earlier run can tell that its deadline is stale.
#[derive(Debug, Clone)]
pub struct DiscussionTimer {
    total: Duration,
    remaining: Duration,
    running_since: Option<Instant>,
    generation: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerStatus {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub running: bool,
    pub expired: bool,
}

impl DiscussionTimer {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            remaining: total,
            running_since: None,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// 開始（一時停止からの再開を含む）。新しいウォッチャーが必要なときだけ
    /// その世代を返す。実行中または時間切れの場合は `None`。
    pub fn start(&mut self, now: Instant) -> Option<u64> {
        if self.is_running() || self.remaining(now).is_zero() {
            return None;
        }
        self.running_since = Some(now);
        self.generation += 1;
        Some(self.generation)
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.remaining = self
                .remaining
                .saturating_sub(now.saturating_duration_since(since));
            self.generation += 1;
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.total;
        self.running_since = None;
        self.generation += 1;
    }

    /// 時間切れを確定させる（ウォッチャーから呼ばれる）
    pub fn finish(&mut self) {
        self.remaining = Duration::ZERO;
        self.running_since = None;
        self.generation += 1;
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self
                .remaining
                .saturating_sub(now.saturating_duration_since(since)),
            None => self.remaining,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    pub fn status(&self, now: Instant) -> TimerStatus {
        let remaining = self.remaining(now);
        TimerStatus {
            total_seconds: self.total.as_secs(),
            // 表示上は切り上げ（残り0.4秒は「1秒」）
            remaining_seconds: remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0),
            running: self.is_running() && !remaining.is_zero(),
            expired: remaining.is_zero(),
        }
    }
}
