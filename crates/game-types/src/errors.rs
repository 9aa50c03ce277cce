use accord_primitives::MechanismId;
use thiserror::Error;

/// Violations of the quorum policy invariants.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum PolicyError {
    #[error("policy needs at least two mechanisms, got {0}")]
    NotEnoughMechanisms(usize),

    #[error("mechanism list not strictly descending at {0}")]
    NotDescending(MechanismId),

    #[error("mechanism list contains the aggregator id {0}")]
    AggregatorInList(MechanismId),

    #[error("threshold must be positive")]
    ZeroThreshold,

    #[error("threshold {threshold} exceeds mechanism count {len}")]
    ThresholdTooHigh { threshold: u32, len: usize },

    #[error("threshold {threshold} below required mechanism count {required}")]
    ThresholdBelowRequired { threshold: u32, required: u32 },
}

/// Malformed packed extra-data payloads.
///
/// These are distinct from generic failures so that a payload whose
/// declared and actual sizes disagree is rejected before it can take on an
/// identity hash.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ExtraDataError {
    #[error("payload truncated, needed {needed} more bytes")]
    Truncated { needed: usize },

    #[error("payload declares no mechanisms")]
    EmptyMechanismList,

    #[error("{0} trailing bytes after last blob")]
    TrailingBytes(usize),
}

/// Failures creating an underlying game via the factory.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FactoryError {
    #[error("factory does not support mechanism {0}")]
    UnsupportedMechanism(MechanismId),

    #[error("factory rejected creation: {0}")]
    Rejected(String),
}

pub type FactoryResult<T> = Result<T, FactoryError>;
