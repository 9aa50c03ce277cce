use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::buf::Buf32;

/// A claimed state of the external chain: a sequence number together with
/// the root value asserted for it. Immutable once a game referencing it
/// exists.
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
pub struct Proposal {
    sequence_number: u64,
    claimed_root: Buf32,
}

impl Proposal {
    pub fn new(sequence_number: u64, claimed_root: Buf32) -> Self {
        Self {
            sequence_number,
            claimed_root,
        }
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn claimed_root(&self) -> Buf32 {
        self.claimed_root
    }
}

impl std::fmt::Debug for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Proposal({}, {})", self.sequence_number, self.claimed_root)
    }
}
