//! Collaborator traits at the boundary between the aggregation core and
//! the individual proof systems.

use std::sync::Arc;

use accord_primitives::{ActorId, Buf32, GameId, GameStatus, MechanismId, Proposal, Timestamp};

use crate::{errors::FactoryResult, policy::PolicySnapshot};

/// Shared handle to a live game instance.
pub type GameHandle = Arc<dyn DisputeGame>;

/// The surface every verification mechanism exposes to the aggregation
/// layer. Implementations resolve on their own schedule; callers poll.
pub trait DisputeGame: Send + Sync {
    /// Externally-visible identity of this game instance.
    fn game_id(&self) -> GameId;

    /// The mechanism this game verifies with.
    fn mechanism_id(&self) -> MechanismId;

    /// The disputed sequence number.
    fn sequence_number(&self) -> u64;

    /// The root value claimed for that sequence number.
    fn root_claim(&self) -> Buf32;

    /// Current status. Terminal statuses never change again.
    fn status(&self) -> GameStatus;

    /// When the game reached its terminal status, if it has.
    fn resolved_at(&self) -> Option<Timestamp>;

    /// When the game was created.
    fn created_at(&self) -> Timestamp;

    /// Downcast hook for games that aggregate other games.
    fn as_aggregated(&self) -> Option<&dyn AggregatedGame> {
        None
    }
}

/// A game whose verdict is an aggregate over other games.
pub trait AggregatedGame: DisputeGame {
    /// The underlying games, in creation order. Fixed after construction.
    fn underlying_games(&self) -> &[GameHandle];

    /// The quorum rules this game was created under.
    fn snapshot(&self) -> &PolicySnapshot;
}

/// Creates underlying game instances for a quorum game.
///
/// The factory is the canonical creation path; implementations are
/// expected to register what they create with the anchor registry.
pub trait GameFactory: Send + Sync {
    fn create_game(
        &self,
        mechanism: MechanismId,
        proposal: Proposal,
        extra_data: &[u8],
        now: Timestamp,
    ) -> FactoryResult<GameHandle>;
}

/// External authorization collaborator gating privileged registry
/// operations.
pub trait GuardianAuth: Send + Sync {
    fn is_guardian(&self, actor: &ActorId) -> bool;
}
