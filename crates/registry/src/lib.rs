//! Anchor registry: canonical finalized-state tracking, per-mechanism
//! finality, blacklisting and the nullification recovery protocol.

// Suppress unused crate dependencies warnings; used by integration tests.
#[cfg(test)]
use accord_test_utils as _;

mod errors;
mod events;
mod finality;
mod params;
mod registry;
mod respected;
mod state;

pub use errors::{RegistryError, RegistryResult};
pub use events::RegistryEvent;
pub use params::{BackupParams, FinalityDelayEntry, PolicyParams, RegistryParams};
pub use registry::AnchorRegistry;
pub use respected::{MechanismRespected, RespectedRule};
pub use state::Anchor;
