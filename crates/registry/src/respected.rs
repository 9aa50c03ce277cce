//! The respected-game predicate.

use accord_game_types::DisputeGame;
use accord_primitives::MechanismId;

/// Decides whether a game's mechanism is one the registry currently
/// trusts. Pluggable so deployments with their own trust bookkeeping can
/// substitute their test.
pub trait RespectedRule: Send + Sync {
    fn is_respected(&self, respected_mechanism: MechanismId, game: &dyn DisputeGame) -> bool;
}

/// Default rule: the game's declared mechanism must equal the registry's
/// respected mechanism id.
#[derive(Clone, Debug, Default)]
pub struct MechanismRespected;

impl RespectedRule for MechanismRespected {
    fn is_respected(&self, respected_mechanism: MechanismId, game: &dyn DisputeGame) -> bool {
        game.mechanism_id() == respected_mechanism
    }
}
