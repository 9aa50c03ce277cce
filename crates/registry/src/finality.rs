//! Finality and blacklist judgment strategies.
//!
//! The base rule knows nothing about aggregation: a game is finalized once
//! its per-mechanism delay has elapsed, blacklisted only if listed
//! directly. The quorum-aware rule handles aggregated games and falls back
//! to the base for everything else.

use accord_game_types::DisputeGame;
use accord_primitives::Timestamp;

use crate::{
    errors::{RegistryError, RegistryResult},
    state::RegistryState,
};

pub(crate) trait FinalityRule: Send + Sync {
    fn is_finalized(
        &self,
        st: &RegistryState,
        game: &dyn DisputeGame,
        now: Timestamp,
    ) -> RegistryResult<bool>;

    fn is_blacklisted(&self, st: &RegistryState, game: &dyn DisputeGame) -> bool;
}

/// Per-mechanism finality delay, direct blacklist lookups.
pub(crate) struct DelayFinality;

impl FinalityRule for DelayFinality {
    fn is_finalized(
        &self,
        st: &RegistryState,
        game: &dyn DisputeGame,
        now: Timestamp,
    ) -> RegistryResult<bool> {
        if !game.status().is_terminal() {
            return Ok(false);
        }
        let Some(resolved_at) = game.resolved_at() else {
            return Ok(false);
        };
        let delay = st.finality_delay(game.mechanism_id());
        Ok(now.saturating_sub(resolved_at) > delay)
    }

    fn is_blacklisted(&self, st: &RegistryState, game: &dyn DisputeGame) -> bool {
        st.blacklist.contains(&game.game_id())
    }
}

/// Aggregation-aware variant consulting [`DelayFinality`] for
/// non-aggregated games.
pub(crate) struct QuorumFinality {
    base: DelayFinality,
}

impl QuorumFinality {
    pub(crate) fn new() -> Self {
        Self {
            base: DelayFinality,
        }
    }

    fn finalized_inner(
        &self,
        st: &RegistryState,
        game: &dyn DisputeGame,
        now: Timestamp,
    ) -> RegistryResult<bool> {
        let Some(agg) = game.as_aggregated() else {
            return self.base.is_finalized(st, game, now);
        };
        if !game.status().is_terminal() {
            return Ok(false);
        }

        // Finality is all-or-nothing for required mechanisms: an
        // unfinalized required game fails the whole judgment rather than
        // merely withholding a vote.
        let snap = agg.snapshot();
        let mut finalized = 0u32;
        for sub in agg.underlying_games() {
            let fin = self.finalized_inner(st, sub.as_ref(), now)?;
            if snap.is_required(sub.mechanism_id()) {
                if !fin {
                    return Err(RegistryError::RequiredGameNotFinalized(sub.mechanism_id()));
                }
                finalized += 1;
            } else if fin {
                finalized += 1;
            }
        }
        Ok(finalized >= snap.threshold())
    }

    fn blacklisted_inner(&self, st: &RegistryState, game: &dyn DisputeGame) -> bool {
        if self.base.is_blacklisted(st, game) {
            return true;
        }
        let Some(agg) = game.as_aggregated() else {
            return false;
        };
        agg.underlying_games()
            .iter()
            .any(|sub| self.blacklisted_inner(st, sub.as_ref()))
    }
}

impl FinalityRule for QuorumFinality {
    fn is_finalized(
        &self,
        st: &RegistryState,
        game: &dyn DisputeGame,
        now: Timestamp,
    ) -> RegistryResult<bool> {
        self.finalized_inner(st, game, now)
    }

    fn is_blacklisted(&self, st: &RegistryState, game: &dyn DisputeGame) -> bool {
        self.blacklisted_inner(st, game)
    }
}
