//! Collection of small data types shared across the dispute stack.

#[macro_use]
mod macros;

pub mod buf;
pub mod hash;
pub mod ids;
pub mod mechanism;
pub mod proposal;
pub mod status;

pub use buf::Buf32;
pub use ids::{ActorId, GameId};
pub use mechanism::MechanismId;
pub use proposal::Proposal;
pub use status::GameStatus;

/// Seconds since the UNIX epoch.
///
/// Entry points that compare against the clock take this explicitly; the
/// host samples the clock at the call boundary.
pub type Timestamp = u64;
