use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Status of a dispute game.
///
/// Starts `InProgress` and transitions at most once to one of the two
/// terminal outcomes.
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Serialize,
    Deserialize,
)]
#[borsh(use_discriminant = false)]
pub enum GameStatus {
    /// The game has not yet reached a verdict.
    InProgress,

    /// The claim survived: the defender of the proposal wins.
    DefenderWins,

    /// The claim was refuted: the challenger wins.
    ChallengerWins,
}

impl GameStatus {
    /// Returns if the game has reached a verdict.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
