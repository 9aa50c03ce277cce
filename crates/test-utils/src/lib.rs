//! Canned collaborators for exercising the dispute quorum stack.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use parking_lot::RwLock;

use accord_game_types::{
    DisputeGame, FactoryError, FactoryResult, GameFactory, GameHandle, GuardianAuth,
};
use accord_primitives::{ActorId, Buf32, GameId, GameStatus, MechanismId, Proposal, Timestamp};

/// Builds an actor id from a single byte, for readable test fixtures.
pub fn actor(tag: u8) -> ActorId {
    let mut data = [0u8; 32];
    data[31] = tag;
    ActorId::from(Buf32::new(data))
}

/// An underlying game whose verdict the test controls.
#[derive(Debug)]
pub struct MockGame {
    game_id: GameId,
    mechanism: MechanismId,
    sequence_number: u64,
    root_claim: Buf32,
    created_at: Timestamp,
    inner: RwLock<(GameStatus, Option<Timestamp>)>,
}

impl MockGame {
    pub fn new(
        mechanism: MechanismId,
        sequence_number: u64,
        root_claim: Buf32,
        created_at: Timestamp,
    ) -> Arc<Self> {
        let game_id = GameId::compute(mechanism, &root_claim, &sequence_number.to_be_bytes());
        Arc::new(Self {
            game_id,
            mechanism,
            sequence_number,
            root_claim,
            created_at,
            inner: RwLock::new((GameStatus::InProgress, None)),
        })
    }

    /// Moves the game to a terminal status.
    pub fn resolve(&self, status: GameStatus, at: Timestamp) {
        assert!(status.is_terminal(), "mock resolution must be terminal");
        let mut inner = self.inner.write();
        *inner = (status, Some(at));
    }
}

impl DisputeGame for MockGame {
    fn game_id(&self) -> GameId {
        self.game_id
    }

    fn mechanism_id(&self) -> MechanismId {
        self.mechanism
    }

    fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    fn root_claim(&self) -> Buf32 {
        self.root_claim
    }

    fn status(&self) -> GameStatus {
        self.inner.read().0
    }

    fn resolved_at(&self) -> Option<Timestamp> {
        self.inner.read().1
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Factory producing [`MockGame`]s, with switches for the failure modes
/// initialization has to survive.
#[derive(Debug, Default)]
pub struct MockFactory {
    created: RwLock<Vec<Arc<MockGame>>>,
    failing: RwLock<HashSet<MechanismId>>,
    misreported: RwLock<HashMap<MechanismId, u64>>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Games created so far, across all quorum games.
    pub fn created(&self) -> Vec<Arc<MockGame>> {
        self.created.read().clone()
    }

    /// Makes creation for a mechanism fail outright.
    pub fn fail_mechanism(&self, mechanism: MechanismId) {
        self.failing.write().insert(mechanism);
    }

    /// Makes games for a mechanism report the wrong sequence number.
    pub fn misreport_sequence(&self, mechanism: MechanismId, sequence: u64) {
        self.misreported.write().insert(mechanism, sequence);
    }
}

impl GameFactory for MockFactory {
    fn create_game(
        &self,
        mechanism: MechanismId,
        proposal: Proposal,
        _extra_data: &[u8],
        now: Timestamp,
    ) -> FactoryResult<GameHandle> {
        if self.failing.read().contains(&mechanism) {
            return Err(FactoryError::UnsupportedMechanism(mechanism));
        }
        let sequence = self
            .misreported
            .read()
            .get(&mechanism)
            .copied()
            .unwrap_or(proposal.sequence_number());

        let game = MockGame::new(mechanism, sequence, proposal.claimed_root(), now);
        self.created.write().push(game.clone());
        Ok(game)
    }
}

/// Guardian accepting exactly one actor.
#[derive(Debug)]
pub struct StaticGuardian(ActorId);

impl StaticGuardian {
    pub fn new(actor: ActorId) -> Self {
        Self(actor)
    }
}

impl GuardianAuth for StaticGuardian {
    fn is_guardian(&self, actor: &ActorId) -> bool {
        *actor == self.0
    }
}
