use accord_primitives::GameStatus;

/// Audit records emitted by a quorum game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameEvent {
    /// The game reached its verdict.
    Resolved(GameStatus),

    /// The game was closed after finalization.
    Closed,
}
