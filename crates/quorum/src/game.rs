//! The quorum game: one dispute instance aggregating several mechanisms'
//! verdicts under a threshold and required-subset rule.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::*;

use accord_game_types::{
    check_mechanism_list, decode_extra_data, AggregatedGame, DisputeGame, GameFactory, GameHandle,
    PolicySnapshot,
};
use accord_primitives::{Buf32, GameId, GameStatus, MechanismId, Proposal, Timestamp};
use accord_registry::AnchorRegistry;

use crate::{
    errors::{QuorumGameError, QuorumResult},
    events::GameEvent,
};

struct GameInner {
    status: GameStatus,
    resolved_at: Option<Timestamp>,
    closed: bool,
    events: Vec<GameEvent>,
}

/// A dispute instance over one proposal, owning a fixed ordered list of
/// underlying games created at initialization.
///
/// Everything except the status cell is immutable after construction; the
/// quorum rules in force at creation are snapshotted and never revisited.
pub struct QuorumGame {
    game_id: GameId,
    mechanism_id: MechanismId,
    proposal: Proposal,
    extra_data: Vec<u8>,
    created_at: Timestamp,
    snapshot: PolicySnapshot,
    games: Vec<GameHandle>,
    registry: Arc<AnchorRegistry>,
    inner: RwLock<GameInner>,
}

impl QuorumGame {
    /// Creates a quorum game from its packed extra data, instantiating
    /// one underlying game per listed mechanism.
    ///
    /// All-or-nothing: a malformed payload, a non-advancing sequence
    /// number, a bad mechanism list, or any factory failure aborts the
    /// whole initialization with nothing retained.
    pub fn initialize(
        registry: Arc<AnchorRegistry>,
        factory: &dyn GameFactory,
        root_claim: Buf32,
        extra_data: &[u8],
        now: Timestamp,
    ) -> QuorumResult<Arc<Self>> {
        let decoded = decode_extra_data(extra_data)?;
        let aggregator = registry.aggregator_id();
        check_mechanism_list(&decoded.mechanism_ids, aggregator)?;

        let sequence = decoded.sequence_number;
        let anchor_seq = registry.anchor().proposal.sequence_number();
        if sequence <= anchor_seq {
            return Err(QuorumGameError::SequenceNotAdvancing {
                proposed: sequence,
                anchor: anchor_seq,
            });
        }

        // A game whose mechanism list matches the live policy exactly
        // adopts its rules; any other game runs unprivileged and can
        // never anchor.
        let live = registry.live_policy();
        let snapshot = if live.mechanism_ids() == decoded.mechanism_ids {
            PolicySnapshot::respected(live.threshold(), live.required_ids())
        } else {
            PolicySnapshot::unprivileged(decoded.mechanism_ids.len() as u32)
        };

        let proposal = Proposal::new(sequence, root_claim);
        let mut games = Vec::with_capacity(decoded.mechanism_ids.len());
        for (mechanism, blob) in decoded.mechanism_ids.iter().zip(decoded.blobs.iter()) {
            let game = factory.create_game(*mechanism, proposal, blob, now)?;
            if game.sequence_number() != sequence {
                return Err(QuorumGameError::FactorySequenceMismatch {
                    mechanism: *mechanism,
                    expected: sequence,
                    got: game.sequence_number(),
                });
            }
            games.push(game);
        }

        let game_id = GameId::compute(aggregator, &root_claim, extra_data);
        debug!(game = %game_id, sequence, games = games.len(), "quorum game created");

        Ok(Arc::new(Self {
            game_id,
            mechanism_id: aggregator,
            proposal,
            extra_data: extra_data.to_vec(),
            created_at: now,
            snapshot,
            games,
            registry,
            inner: RwLock::new(GameInner {
                status: GameStatus::InProgress,
                resolved_at: None,
                closed: false,
                events: Vec::new(),
            }),
        }))
    }

    /// Polls the underlying games and decides the aggregate verdict if it
    /// is decidable.
    ///
    /// Re-callable until a verdict lands; afterwards returns
    /// [`QuorumGameError::AlreadyResolved`]. A required mechanism still
    /// in progress or an undecidable tally yield retryable errors.
    pub fn resolve(&self, now: Timestamp) -> QuorumResult<GameStatus> {
        let mut inner = self.inner.write();
        if inner.status.is_terminal() {
            return Err(QuorumGameError::AlreadyResolved);
        }

        let mut defender_votes = 0u32;
        let mut not_all_resolved = false;
        let mut verdict = None;

        for game in &self.games {
            let status = game.status();
            if self.snapshot.is_required(game.mechanism_id()) {
                match status {
                    GameStatus::InProgress => {
                        return Err(QuorumGameError::RequiredGameUnresolved(game.mechanism_id()))
                    }
                    // A required mechanism's rejection is decisive.
                    GameStatus::ChallengerWins => {
                        verdict = Some(GameStatus::ChallengerWins);
                        break;
                    }
                    GameStatus::DefenderWins => defender_votes += 1,
                }
            } else {
                match status {
                    GameStatus::InProgress => not_all_resolved = true,
                    GameStatus::DefenderWins => defender_votes += 1,
                    GameStatus::ChallengerWins => {}
                }
            }
        }

        let status = match verdict {
            Some(s) => s,
            None if defender_votes >= self.snapshot.threshold() => GameStatus::DefenderWins,
            None if !not_all_resolved => GameStatus::ChallengerWins,
            None => return Err(QuorumGameError::NotYetResolvable),
        };

        inner.status = status;
        inner.resolved_at = Some(now);
        inner.events.push(GameEvent::Resolved(status));
        info!(game = %self.game_id, ?status, defender_votes, "quorum game resolved");
        Ok(status)
    }

    /// Closes a defender-won game once the registry judges it finalized,
    /// and offers it as the new anchor.
    pub fn close(&self, now: Timestamp) -> QuorumResult<()> {
        if self.registry.is_paused() {
            return Err(QuorumGameError::Paused);
        }
        {
            let inner = self.inner.read();
            match inner.status {
                GameStatus::InProgress => return Err(QuorumGameError::NotResolved),
                GameStatus::ChallengerWins => return Err(QuorumGameError::DefenderLost),
                GameStatus::DefenderWins => {}
            }
            if inner.closed {
                return Err(QuorumGameError::AlreadyClosed);
            }
        }

        if !self.registry.is_finalized(self, now)? {
            return Err(QuorumGameError::NotFinalized);
        }

        // Best effort: anchor eligibility can legitimately be lost
        // between resolution and close (another game may have advanced
        // the anchor first), and that must not block closing.
        if let Err(e) = self.registry.set_anchor(self, now) {
            debug!(game = %self.game_id, err = %e, "anchor update skipped");
        }

        let mut inner = self.inner.write();
        inner.closed = true;
        inner.events.push(GameEvent::Closed);
        info!(game = %self.game_id, "quorum game closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().closed
    }

    /// The packed payload this game was created from.
    pub fn extra_data(&self) -> &[u8] {
        &self.extra_data
    }

    pub fn proposal(&self) -> Proposal {
        self.proposal
    }

    /// Audit log snapshot.
    pub fn events(&self) -> Vec<GameEvent> {
        self.inner.read().events.clone()
    }
}

impl DisputeGame for QuorumGame {
    fn game_id(&self) -> GameId {
        self.game_id
    }

    fn mechanism_id(&self) -> MechanismId {
        self.mechanism_id
    }

    fn sequence_number(&self) -> u64 {
        self.proposal.sequence_number()
    }

    fn root_claim(&self) -> Buf32 {
        self.proposal.claimed_root()
    }

    fn status(&self) -> GameStatus {
        self.inner.read().status
    }

    fn resolved_at(&self) -> Option<Timestamp> {
        self.inner.read().resolved_at
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn as_aggregated(&self) -> Option<&dyn AggregatedGame> {
        Some(self)
    }
}

impl AggregatedGame for QuorumGame {
    fn underlying_games(&self) -> &[GameHandle] {
        &self.games
    }

    fn snapshot(&self) -> &PolicySnapshot {
        &self.snapshot
    }
}

impl std::fmt::Debug for QuorumGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuorumGame")
            .field("game_id", &self.game_id)
            .field("proposal", &self.proposal)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
