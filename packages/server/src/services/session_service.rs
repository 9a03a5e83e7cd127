use impostor_core::{
    ConfigurationError, GameSetup, RandomSelector, RoundAssignment, SessionError, WordSource,
};
use chrono::Utc;
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};
use tokio::sync::MutexGuard;
use tokio::task::JoinHandle;

use crate::{
    models::{
        notification::Notification,
        session::{GamePhase, GameSession, RevealCard, SessionStats, SessionView},
        timer::TimerStatus,
    },
    state::AppState,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionServiceError {
    #[error("設定エラー: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("セッションエラー: {0}")]
    Session(#[from] SessionError),
    #[error("セッションが見つかりません: {0}")]
    SessionNotFound(String),
    #[error("ラウンドの準備中です")]
    RoundPending,
    #[error("現在のフェーズ({0})ではこの操作はできません")]
    InvalidPhase(GamePhase),
    #[error("ワード取得タスクが失敗しました: {0}")]
    WordTask(String),
}

// ワード取得タスクに渡すラウンドの材料
struct PendingRound {
    impostors: BTreeSet<usize>,
    language: String,
    custom_words: BTreeSet<String>,
    selector: RandomSelector,
    from_phase: GamePhase,
}

const MIN_REAP_INTERVAL: Duration = Duration::from_millis(100);
const MAX_REAP_INTERVAL: Duration = Duration::from_secs(60);

// 見つかったセッションは操作があったものとして最終アクセス時刻を更新する
fn find_session<'a>(
    sessions: &'a mut MutexGuard<'_, HashMap<String, GameSession>>,
    session_id: &str,
) -> Result<&'a mut GameSession, SessionServiceError> {
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| SessionServiceError::SessionNotFound(session_id.to_string()))?;
    session.touch();
    Ok(session)
}

fn require_phase(session: &GameSession, expected: GamePhase) -> Result<(), SessionServiceError> {
    match session.phase {
        phase if phase == expected => Ok(()),
        GamePhase::Loading => Err(SessionServiceError::RoundPending),
        phase => Err(SessionServiceError::InvalidPhase(phase)),
    }
}

/// Validates the setup, assigns the first round and waits until its word is ready.
pub async fn create_session(
    state: AppState,
    setup: GameSetup,
) -> Result<SessionView, SessionServiceError> {
    let language = state.config.resolve_language(setup.language.as_deref());
    let config = setup.into_config()?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let mut session = GameSession::new(
        session_id.clone(),
        config,
        language,
        state.config.discussion_duration,
    );

    let impostors = session
        .engine
        .assign_for_new_session(&session.config, &mut session.state)?;
    let pending = PendingRound {
        impostors,
        language: session.language.clone(),
        custom_words: session.config.custom_words().clone(),
        selector: session.engine.selector_mut().split(),
        from_phase: GamePhase::Loading,
    };

    tracing::info!(
        "Session {} created: {} players, {} impostor(s), language {}",
        session_id,
        session.config.player_count(),
        session.config.impostor_count(),
        session.language
    );
    state.create_session_channel(&session_id).await;
    state
        .sessions
        .lock()
        .await
        .insert(session_id.clone(), session);

    install_round(state.clone(), session_id.clone(), pending).await?;
    get_session_view(state, &session_id).await
}

/// ワードを取得して新しいラウンドを確定させる。
///
/// 取得は別タスクで実行するので、リクエストが途中で破棄されても
/// タイムアウト経由で必ずラウンドが確定し `Loading` のまま残らない。
async fn install_round(
    state: AppState,
    session_id: String,
    pending: PendingRound,
) -> Result<(), SessionServiceError> {
    let handle = tokio::spawn(async move {
        let PendingRound {
            impostors,
            language,
            custom_words,
            mut selector,
            from_phase,
        } = pending;

        let pick = state
            .word_provider
            .get_word(&language, &custom_words, &mut selector)
            .await;
        let fallback_reason = match &pick.source {
            WordSource::Fallback { reason } => Some(reason.clone()),
            _ => None,
        };

        {
            let mut sessions = state.sessions.lock().await;
            // 取得中にセッションが終了された場合
            let session = find_session(&mut sessions, &session_id)?;
            session.start_round(RoundAssignment::new(impostors, pick));
        }

        if let Some(reason) = fallback_reason {
            let notification =
                Notification::fallback_word_used(&session_id, &language, reason);
            if let Err(e) = state.broadcast_notification(&session_id, &notification).await {
                tracing::warn!("{}", e);
            }
        }
        let notification = Notification::phase_change(&session_id, from_phase, GamePhase::Reveal);
        if let Err(e) = state.broadcast_notification(&session_id, &notification).await {
            tracing::warn!("{}", e);
        }
        Ok::<(), SessionServiceError>(())
    });

    handle
        .await
        .map_err(|e| SessionServiceError::WordTask(e.to_string()))?
}

pub async fn get_session_view(
    state: AppState,
    session_id: &str,
) -> Result<SessionView, SessionServiceError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, session_id)?;
    Ok(session.view())
}

pub async fn get_session_stats(
    state: AppState,
    session_id: &str,
) -> Result<SessionStats, SessionServiceError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, session_id)?;
    Ok(session.stats(state.config.show_impostors))
}

pub async fn reveal_current(
    state: AppState,
    session_id: &str,
) -> Result<RevealCard, SessionServiceError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, session_id)?;
    require_phase(session, GamePhase::Reveal)?;
    session
        .reveal_card()
        .ok_or(SessionServiceError::InvalidPhase(session.phase))
}

pub async fn advance_reveal(
    state: AppState,
    session_id: &str,
) -> Result<SessionView, SessionServiceError> {
    let view = {
        let mut sessions = state.sessions.lock().await;
        let session = find_session(&mut sessions, session_id)?;
        require_phase(session, GamePhase::Reveal)?;
        session.advance_reveal();
        session.view()
    };

    if view.phase == GamePhase::AllRevealed {
        let notification =
            Notification::phase_change(session_id, GamePhase::Reveal, GamePhase::AllRevealed);
        if let Err(e) = state.broadcast_notification(session_id, &notification).await {
            tracing::warn!("{}", e);
        }
    }
    Ok(view)
}

pub async fn start_discussion(
    state: AppState,
    session_id: &str,
) -> Result<SessionView, SessionServiceError> {
    let view = {
        let mut sessions = state.sessions.lock().await;
        let session = find_session(&mut sessions, session_id)?;
        require_phase(session, GamePhase::AllRevealed)?;
        session.phase = GamePhase::Discussion;
        session.timer.reset();
        session.view()
    };

    let notification =
        Notification::phase_change(session_id, GamePhase::AllRevealed, GamePhase::Discussion);
    if let Err(e) = state.broadcast_notification(session_id, &notification).await {
        tracing::warn!("{}", e);
    }
    Ok(view)
}

/// Starts the next round of the same session. Rejected while a previous
/// restart is still waiting for its word.
pub async fn restart_round(
    state: AppState,
    session_id: &str,
) -> Result<SessionView, SessionServiceError> {
    let pending = {
        let mut sessions = state.sessions.lock().await;
        let session = find_session(&mut sessions, session_id)?;
        if session.phase == GamePhase::Loading {
            return Err(SessionServiceError::RoundPending);
        }

        let from_phase = session.phase;
        let impostors = session
            .engine
            .assign_for_restart(&session.config, &mut session.state)?;
        session.begin_loading();

        tracing::info!(
            "Session {} restarted (game #{}{})",
            session_id,
            session.state.games_played_count(),
            if session.state.is_special_round() { ", special round" } else { "" }
        );

        PendingRound {
            impostors,
            language: session.language.clone(),
            custom_words: session.config.custom_words().clone(),
            selector: session.engine.selector_mut().split(),
            from_phase,
        }
    };

    install_round(state.clone(), session_id.to_string(), pending).await?;
    get_session_view(state, session_id).await
}

pub async fn end_session(state: AppState, session_id: &str) -> Result<(), SessionServiceError> {
    let removed = state.sessions.lock().await.remove(session_id);
    let Some(mut session) = removed else {
        return Err(SessionServiceError::SessionNotFound(session_id.to_string()));
    };
    let games_played = session.state.games_played_count();
    session.state.end();
    tracing::info!("Session {} ended after {} game(s)", session_id, games_played);

    if let Err(e) = state
        .broadcast_notification(session_id, &Notification::session_ended(session_id))
        .await
    {
        tracing::warn!("{}", e);
    }
    state.remove_session_channel(session_id).await;
    Ok(())
}

/// `session_ttl` 以上操作のないセッションを終了させる。削除したIDを返す。
pub async fn evict_idle_sessions(state: AppState) -> Vec<String> {
    let now = Utc::now();
    let ttl = state.config.session_ttl;
    let evicted: Vec<String> = {
        let mut sessions = state.sessions.lock().await;
        let idle: Vec<String> = sessions
            .iter()
            .filter(|(_, session)| session.is_idle(now, ttl))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &idle {
            if let Some(mut session) = sessions.remove(id) {
                session.state.end();
            }
        }
        idle
    };

    for session_id in &evicted {
        tracing::info!("Session {} evicted after {:?} of inactivity", session_id, ttl);
        if let Err(e) = state
            .broadcast_notification(session_id, &Notification::session_ended(session_id))
            .await
        {
            tracing::warn!("{}", e);
        }
        state.remove_session_channel(session_id).await;
    }
    evicted
}

/// 放置されたセッションを定期的に掃除するタスクを起動する
pub fn spawn_session_reaper(state: AppState) -> JoinHandle<()> {
    let period = state
        .config
        .session_ttl
        .clamp(MIN_REAP_INTERVAL, MAX_REAP_INTERVAL);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            evict_idle_sessions(state.clone()).await;
        }
    })
}

pub async fn get_timer_status(
    state: AppState,
    session_id: &str,
) -> Result<TimerStatus, SessionServiceError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, session_id)?;
    Ok(session.timer.status(Instant::now()))
}

/// 議論タイマーを開始（再開）し、時間切れを通知するウォッチャーを起動する
pub async fn start_timer(
    state: AppState,
    session_id: &str,
) -> Result<TimerStatus, SessionServiceError> {
    let (generation, remaining, status) = {
        let mut sessions = state.sessions.lock().await;
        let session = find_session(&mut sessions, session_id)?;
        require_phase(session, GamePhase::Discussion)?;
        let now = Instant::now();
        let generation = session.timer.start(now);
        (generation, session.timer.remaining(now), session.timer.status(now))
    };

    if let Some(generation) = generation {
        let state = state.clone();
        let session_id = session_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            watch_timer(state, session_id, generation).await;
        });
    }
    Ok(status)
}

async fn watch_timer(state: AppState, session_id: String, generation: u64) {
    {
        let mut sessions = state.sessions.lock().await;
        let Some(session) = sessions.get_mut(&session_id) else {
            return;
        };
        // 一時停止・リセット・再開始されていたら何もしない
        if session.timer.generation() != generation || !session.timer.is_expired(Instant::now()) {
            return;
        }
        session.timer.finish();
    }

    tracing::info!("Discussion time is up in session {}", session_id);
    if let Err(e) = state
        .broadcast_notification(&session_id, &Notification::time_up(&session_id))
        .await
    {
        tracing::warn!("{}", e);
    }
}

pub async fn pause_timer(
    state: AppState,
    session_id: &str,
) -> Result<TimerStatus, SessionServiceError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, session_id)?;
    require_phase(session, GamePhase::Discussion)?;
    let now = Instant::now();
    session.timer.pause(now);
    Ok(session.timer.status(now))
}

pub async fn reset_timer(
    state: AppState,
    session_id: &str,
) -> Result<TimerStatus, SessionServiceError> {
    let mut sessions = state.sessions.lock().await;
    let session = find_session(&mut sessions, session_id)?;
    require_phase(session, GamePhase::Discussion)?;
    session.timer.reset();
    Ok(session.timer.status(Instant::now()))
}
