//! The registry's interior state. Mutated only under the single lock held
//! by [`crate::AnchorRegistry`]'s entry points.

use std::collections::{HashMap, HashSet};

use accord_game_types::{MechanismSpec, QuorumPolicy};
use accord_primitives::{GameId, MechanismId, Proposal, Timestamp};
use serde::{Deserialize, Serialize};

use crate::events::RegistryEvent;

/// The most recently accepted finalized proposal, plus the game that
/// produced it. The genesis anchor has no producing game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub proposal: Proposal,
    pub game: Option<GameId>,
}

/// Provenance record for a game created through the canonical factory
/// path.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct RegisteredGame {
    pub(crate) mechanism: MechanismId,
}

pub(crate) struct RegistryState {
    /// Mechanism id of the quorum aggregator. Fixed at construction.
    pub(crate) aggregator_id: MechanismId,

    pub(crate) anchor: Anchor,

    /// The live policy's mechanism list. `threshold` is stored apart so it
    /// can be overridden alone and carried across nullification.
    pub(crate) specs: Vec<MechanismSpec>,
    pub(crate) threshold: u32,

    /// The mechanism currently trusted to produce new anchors.
    pub(crate) respected_mechanism: MechanismId,

    pub(crate) backup_mechanism: Option<MechanismId>,
    pub(crate) backup_specs: Vec<MechanismSpec>,

    pub(crate) default_finality_delay: u64,
    pub(crate) finality_delays: HashMap<MechanismId, u64>,

    pub(crate) blacklist: HashSet<GameId>,
    pub(crate) registered: HashMap<GameId, RegisteredGame>,

    /// Set on nullification; games created before it are not
    /// anchor-eligible.
    pub(crate) retirement_timestamp: Option<Timestamp>,

    pub(crate) paused: bool,

    pub(crate) events: Vec<RegistryEvent>,
}

impl RegistryState {
    pub(crate) fn finality_delay(&self, mechanism: MechanismId) -> u64 {
        self.finality_delays
            .get(&mechanism)
            .copied()
            .unwrap_or(self.default_finality_delay)
    }

    pub(crate) fn live_policy(&self) -> QuorumPolicy {
        QuorumPolicy::new(self.specs.clone(), self.threshold)
    }

    pub(crate) fn is_retired(&self, created_at: Timestamp) -> bool {
        self.retirement_timestamp
            .is_some_and(|retired_at| created_at < retired_at)
    }

    pub(crate) fn push_event(&mut self, ev: RegistryEvent) {
        self.events.push(ev);
    }
}
