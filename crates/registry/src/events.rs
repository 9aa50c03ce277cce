//! Audit records for registry state changes.

use accord_game_types::MechanismSpec;
use accord_primitives::{GameId, MechanismId, Proposal};
use serde::{Deserialize, Serialize};

/// Appended to the registry's in-memory log on every successful mutation,
/// mirroring the tracing output in a queryable form.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    ThresholdSet {
        threshold: u32,
    },

    PolicySet {
        mechanisms: Vec<MechanismSpec>,
        threshold: u32,
    },

    BackupPolicySet {
        mechanism: MechanismId,
        mechanisms: Vec<MechanismSpec>,
    },

    FinalityDelaySet {
        mechanism: MechanismId,
        delay: u64,
    },

    PausedSet {
        paused: bool,
    },

    GameBlacklisted {
        game: GameId,
    },

    AnchorUpdated {
        proposal: Proposal,
        game: GameId,
    },

    /// A respected mechanism was found unsound and trust was shifted to
    /// the backup configuration.
    SoundnessIssue {
        game: GameId,
        mechanism: MechanismId,
    },
}
