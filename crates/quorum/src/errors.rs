use accord_game_types::{ExtraDataError, FactoryError, PolicyError};
use accord_primitives::MechanismId;
use accord_registry::RegistryError;
use thiserror::Error;

pub type QuorumResult<T> = Result<T, QuorumGameError>;

/// Failures from quorum game entry points.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum QuorumGameError {
    #[error("malformed extra data: {0}")]
    ExtraData(#[from] ExtraDataError),

    #[error("invalid mechanism list: {0}")]
    Policy(#[from] PolicyError),

    #[error("sequence number {proposed} does not advance past anchor {anchor}")]
    SequenceNotAdvancing { proposed: u64, anchor: u64 },

    #[error("factory game for {mechanism} reports sequence {got}, wanted {expected}")]
    FactorySequenceMismatch {
        mechanism: MechanismId,
        expected: u64,
        got: u64,
    },

    #[error("underlying game creation failed: {0}")]
    Factory(#[from] FactoryError),

    #[error("game already resolved")]
    AlreadyResolved,

    #[error("required game for {0} not resolved")]
    RequiredGameUnresolved(MechanismId),

    #[error("quorum not yet resolvable")]
    NotYetResolvable,

    #[error("game not resolved")]
    NotResolved,

    #[error("game not yet finalized")]
    NotFinalized,

    #[error("game did not resolve in the defender's favor")]
    DefenderLost,

    #[error("registry is paused")]
    Paused,

    #[error("game already closed")]
    AlreadyClosed,

    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}

impl QuorumGameError {
    /// Conditions the caller should retry once more underlying games have
    /// resolved or more time has passed.
    pub fn is_retryable(&self) -> bool {
        match self {
            QuorumGameError::RequiredGameUnresolved(_)
            | QuorumGameError::NotYetResolvable
            | QuorumGameError::NotFinalized => true,
            QuorumGameError::Registry(e) => e.is_retryable(),
            _ => false,
        }
    }
}
