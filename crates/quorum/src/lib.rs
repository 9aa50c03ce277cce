//! Quorum dispute game: aggregates independent verification mechanisms'
//! verdicts into one decision.

// Suppress unused crate dependencies warnings; used by integration tests.
#[cfg(test)]
use accord_test_utils as _;

mod errors;
mod events;
mod game;

pub use errors::{QuorumGameError, QuorumResult};
pub use events::GameEvent;
pub use game::QuorumGame;
