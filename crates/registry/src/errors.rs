use accord_game_types::PolicyError;
use accord_primitives::{GameId, MechanismId};
use thiserror::Error;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Failures from registry entry points.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RegistryError {
    #[error("caller is not the guardian")]
    Unauthorized,

    #[error("policy can only change while the aggregator is respected")]
    PolicyLocked,

    #[error("finality delay must be positive")]
    ZeroFinalityDelay,

    #[error("cannot set a finality delay for the aggregator {0}")]
    AggregatorDelay(MechanismId),

    #[error("required game for {0} not finalized")]
    RequiredGameNotFinalized(MechanismId),

    #[error("game not resolved")]
    NotResolved,

    #[error("game not yet finalized")]
    NotFinalized,

    #[error("game did not resolve in the defender's favor")]
    DefenderLost,

    #[error("game is blacklisted")]
    Blacklisted,

    #[error("game predates the retirement timestamp")]
    Retired,

    #[error("game's mechanism is not respected")]
    NotRespected,

    #[error("sequence number {proposed} does not advance past anchor {anchor}")]
    SequenceNotAdvancing { proposed: u64, anchor: u64 },

    #[error("game {0} was not created through the canonical factory path")]
    UnknownGame(GameId),

    #[error("no backup mechanism configured")]
    NoBackupConfigured,

    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),
}

impl RegistryError {
    /// Conditions the caller is expected to retry after time passes or
    /// more games resolve, as opposed to hard precondition violations.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::NotResolved
                | RegistryError::NotFinalized
                | RegistryError::RequiredGameNotFinalized(_)
        )
    }
}
