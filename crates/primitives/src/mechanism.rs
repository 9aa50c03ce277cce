use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Identifier for a verification mechanism.
///
/// Opaque to the aggregation logic; the values below are conventions for
/// the mechanisms we deploy, nothing in the core depends on them.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct MechanismId(u16);

/// Optimistic fault-proof bisection game.
pub const FAULT_PROOF: MechanismId = MechanismId(1);

/// Trusted-execution-environment attestation game.
pub const TEE_ATTEST: MechanismId = MechanismId(2);

/// Zero-knowledge validity-proof game.
pub const ZK_PROOF: MechanismId = MechanismId(3);

/// The quorum aggregator itself.
pub const QUORUM: MechanismId = MechanismId(64);

impl MechanismId {
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u16> for MechanismId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for MechanismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mechanism{}", self.0)
    }
}

impl fmt::Debug for MechanismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MechanismId({})", self.0)
    }
}
