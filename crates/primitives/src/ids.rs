//! Identity newtypes for games and actors.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{buf::Buf32, hash, mechanism::MechanismId};

/// Externally-visible identity of a game instance.
///
/// Derived from the creating mechanism, the root claim and the raw extra
/// data, so two games created with byte-identical inputs collide on the
/// same identity.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
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
pub struct GameId(Buf32);

impl_buf_wrapper!(GameId, Buf32, 32);

impl GameId {
    /// Computes the identity hash for a game created with these inputs.
    pub fn compute(mechanism: MechanismId, root_claim: &Buf32, extra_data: &[u8]) -> Self {
        let mut buf = Vec::with_capacity(2 + 32 + extra_data.len());
        buf.extend_from_slice(&mechanism.as_u16().to_be_bytes());
        buf.extend_from_slice(root_claim.as_slice());
        buf.extend_from_slice(extra_data);
        Self(hash::raw(&buf))
    }
}

/// Identity of an external caller, used for authorization checks.
#[derive(
    Copy,
    Clone,
    Eq,
    Default,
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
pub struct ActorId(Buf32);

impl_buf_wrapper!(ActorId, Buf32, 32);
