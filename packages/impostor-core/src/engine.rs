use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::SessionError;
use crate::models::GameConfig;
use crate::selector::RandomSelector;
use crate::session::SessionState;

/// Picks the impostors of each round.
///
/// The first round of a session is a plain uniform draw. On every restart the
/// previous round's impostors are avoided (best effort), except on special
/// rounds where `games_played_count` is a multiple of
/// [`SPECIAL_ROUND_INTERVAL`](crate::session::SPECIAL_ROUND_INTERVAL), so that
/// "I was impostor last round" never proves innocence.
#[derive(Debug, Clone)]
pub struct RoleAssignmentEngine<R = StdRng> {
    selector: RandomSelector<R>,
}

impl Default for RoleAssignmentEngine<StdRng> {
    fn default() -> Self {
        Self::new(RandomSelector::from_entropy())
    }
}

impl<R: Rng> RoleAssignmentEngine<R> {
    pub fn new(selector: RandomSelector<R>) -> Self {
        Self { selector }
    }

    pub fn selector_mut(&mut self) -> &mut RandomSelector<R> {
        &mut self.selector
    }

    pub fn assign_for_new_session(
        &mut self,
        config: &GameConfig,
        state: &mut SessionState,
    ) -> Result<BTreeSet<usize>, SessionError> {
        config.validate()?;
        state.reset();

        let impostors = self.selector.choose_distinct(
            config.player_count(),
            config.impostor_count(),
            &BTreeSet::new(),
        );
        state.set_current_impostors(impostors.clone());

        tracing::debug!(
            "new session: {} impostor(s) among {} players",
            impostors.len(),
            config.player_count()
        );
        Ok(impostors)
    }

    pub fn assign_for_restart(
        &mut self,
        config: &GameConfig,
        state: &mut SessionState,
    ) -> Result<BTreeSet<usize>, SessionError> {
        config.validate()?;
        if !state.is_active() {
            return Err(SessionError::NotActive(state.status()));
        }

        state.begin_restart();

        let impostors = if state.is_special_round() {
            tracing::info!(
                "special round {}: previous impostors may be picked again",
                state.games_played_count()
            );
            self.selector.choose_distinct(
                config.player_count(),
                config.impostor_count(),
                &BTreeSet::new(),
            )
        } else {
            self.selector.choose_distinct(
                config.player_count(),
                config.impostor_count(),
                state.last_impostor_indices(),
            )
        };
        state.set_current_impostors(impostors.clone());

        Ok(impostors)
    }
}
