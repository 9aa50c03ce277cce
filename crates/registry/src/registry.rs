//! The anchor registry: the authoritative record of the last finalized
//! proposal, plus the trust bookkeeping that decides which games may
//! produce the next one.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use parking_lot::RwLock;
use tracing::*;

use accord_game_types::{
    check_spec_list, check_threshold, DisputeGame, GuardianAuth, MechanismSpec, PolicyError,
    QuorumPolicy,
};
use accord_primitives::{ActorId, GameId, GameStatus, MechanismId, Proposal, Timestamp};

use crate::{
    errors::{RegistryError, RegistryResult},
    events::RegistryEvent,
    finality::{FinalityRule, QuorumFinality},
    params::RegistryParams,
    respected::{MechanismRespected, RespectedRule},
    state::{Anchor, RegisteredGame, RegistryState},
};

/// Process-wide registry state. Every entry point validates, then mutates
/// under a single lock; there is no teardown and no rollback.
pub struct AnchorRegistry {
    guardian: Arc<dyn GuardianAuth>,
    respected_rule: Arc<dyn RespectedRule>,
    finality: QuorumFinality,
    state: RwLock<RegistryState>,
}

impl AnchorRegistry {
    /// Builds a registry from validated params with the default respected
    /// rule.
    pub fn new(params: RegistryParams, guardian: Arc<dyn GuardianAuth>) -> RegistryResult<Self> {
        Self::with_respected_rule(params, guardian, Arc::new(MechanismRespected))
    }

    /// Builds a registry with a deployment-specific respected predicate.
    pub fn with_respected_rule(
        params: RegistryParams,
        guardian: Arc<dyn GuardianAuth>,
        respected_rule: Arc<dyn RespectedRule>,
    ) -> RegistryResult<Self> {
        params.check_well_formed()?;

        let (backup_mechanism, backup_specs) = match &params.backup {
            Some(b) => (Some(b.mechanism), b.mechanisms.clone()),
            None => (None, Vec::new()),
        };

        let state = RegistryState {
            aggregator_id: params.aggregator_mechanism,
            anchor: Anchor {
                proposal: params.genesis_anchor,
                game: None,
            },
            specs: params.policy.mechanisms.clone(),
            threshold: params.policy.threshold,
            respected_mechanism: params.aggregator_mechanism,
            backup_mechanism,
            backup_specs,
            default_finality_delay: params.default_finality_delay,
            finality_delays: params
                .finality_delays
                .iter()
                .map(|e| (e.mechanism, e.delay))
                .collect::<HashMap<_, _>>(),
            blacklist: HashSet::new(),
            registered: HashMap::new(),
            retirement_timestamp: None,
            paused: false,
            events: Vec::new(),
        };

        Ok(Self {
            guardian,
            respected_rule,
            finality: QuorumFinality::new(),
            state: RwLock::new(state),
        })
    }

    // --- read-only views ---

    pub fn aggregator_id(&self) -> MechanismId {
        self.state.read().aggregator_id
    }

    pub fn anchor(&self) -> Anchor {
        self.state.read().anchor.clone()
    }

    pub fn live_policy(&self) -> QuorumPolicy {
        self.state.read().live_policy()
    }

    pub fn respected_mechanism(&self) -> MechanismId {
        self.state.read().respected_mechanism
    }

    pub fn retirement_timestamp(&self) -> Option<Timestamp> {
        self.state.read().retirement_timestamp
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn finality_delay(&self, mechanism: MechanismId) -> u64 {
        self.state.read().finality_delay(mechanism)
    }

    pub fn is_registered(&self, game: GameId) -> bool {
        self.state.read().registered.contains_key(&game)
    }

    /// Snapshot of the audit log.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.state.read().events.clone()
    }

    // --- guardian-gated policy management ---

    /// Replaces the active policy. Only possible while the aggregator is
    /// still the respected mechanism; after nullification the policy is
    /// frozen in its degraded form.
    pub fn set_policy(&self, caller: &ActorId, policy: QuorumPolicy) -> RegistryResult<()> {
        self.ensure_guardian(caller)?;
        let mut st = self.state.write();
        if st.respected_mechanism != st.aggregator_id {
            return Err(RegistryError::PolicyLocked);
        }
        policy.check_well_formed(st.aggregator_id)?;

        st.specs = policy.specs().to_vec();
        st.threshold = policy.threshold();
        info!(threshold = policy.threshold(), len = st.specs.len(), "policy set");
        st.push_event(RegistryEvent::PolicySet {
            mechanisms: policy.specs().to_vec(),
            threshold: policy.threshold(),
        });
        Ok(())
    }

    /// Overrides the threshold alone, against the current mechanism list.
    pub fn set_threshold(&self, caller: &ActorId, threshold: u32) -> RegistryResult<()> {
        self.ensure_guardian(caller)?;
        let mut st = self.state.write();
        check_threshold(threshold, &st.specs)?;

        st.threshold = threshold;
        info!(threshold, "threshold set");
        st.push_event(RegistryEvent::ThresholdSet { threshold });
        Ok(())
    }

    pub fn set_finality_delay(
        &self,
        caller: &ActorId,
        mechanism: MechanismId,
        delay: u64,
    ) -> RegistryResult<()> {
        self.ensure_guardian(caller)?;
        if delay == 0 {
            return Err(RegistryError::ZeroFinalityDelay);
        }
        let mut st = self.state.write();
        if mechanism == st.aggregator_id {
            return Err(RegistryError::AggregatorDelay(mechanism));
        }

        st.finality_delays.insert(mechanism, delay);
        info!(%mechanism, delay, "finality delay set");
        st.push_event(RegistryEvent::FinalityDelaySet { mechanism, delay });
        Ok(())
    }

    /// Configures the fallback installed by nullification: a single
    /// mechanism to respect, and optionally a replacement policy list.
    pub fn set_backup(
        &self,
        caller: &ActorId,
        mechanism: MechanismId,
        mechanisms: Vec<MechanismSpec>,
    ) -> RegistryResult<()> {
        self.ensure_guardian(caller)?;
        let mut st = self.state.write();
        if mechanism == st.aggregator_id {
            return Err(PolicyError::AggregatorInList(mechanism).into());
        }
        if !mechanisms.is_empty() {
            check_spec_list(&mechanisms, st.aggregator_id)?;
        }

        st.backup_mechanism = Some(mechanism);
        st.backup_specs = mechanisms.clone();
        info!(%mechanism, len = mechanisms.len(), "backup policy set");
        st.push_event(RegistryEvent::BackupPolicySet {
            mechanism,
            mechanisms,
        });
        Ok(())
    }

    pub fn set_paused(&self, caller: &ActorId, paused: bool) -> RegistryResult<()> {
        self.ensure_guardian(caller)?;
        let mut st = self.state.write();
        st.paused = paused;
        warn!(paused, "pause state changed");
        st.push_event(RegistryEvent::PausedSet { paused });
        Ok(())
    }

    pub fn blacklist_game(&self, caller: &ActorId, game: GameId) -> RegistryResult<()> {
        self.ensure_guardian(caller)?;
        let mut st = self.state.write();
        st.blacklist.insert(game);
        warn!(%game, "game blacklisted");
        st.push_event(RegistryEvent::GameBlacklisted { game });
        Ok(())
    }

    // --- game bookkeeping ---

    /// Records a game created through the canonical factory path.
    /// Idempotent.
    pub fn register_game(&self, game: &dyn DisputeGame) {
        let mut st = self.state.write();
        st.registered.insert(
            game.game_id(),
            RegisteredGame {
                mechanism: game.mechanism_id(),
            },
        );
    }

    /// A game is blacklisted if listed directly, or if any game it
    /// aggregates is.
    pub fn is_blacklisted(&self, game: &dyn DisputeGame) -> bool {
        let st = self.state.read();
        self.finality.is_blacklisted(&st, game)
    }

    /// Whether a game's verdict has become irreversible.
    ///
    /// For an aggregated game this applies the quorum rules the game was
    /// created under; a required underlying game that is not itself
    /// finalized fails the whole judgment.
    pub fn is_finalized(&self, game: &dyn DisputeGame, now: Timestamp) -> RegistryResult<bool> {
        let st = self.state.read();
        self.finality.is_finalized(&st, game, now)
    }

    /// Accepts a game's proposal as the new anchor.
    pub fn set_anchor(&self, game: &dyn DisputeGame, now: Timestamp) -> RegistryResult<()> {
        let mut st = self.state.write();

        match game.status() {
            GameStatus::InProgress => return Err(RegistryError::NotResolved),
            GameStatus::ChallengerWins => return Err(RegistryError::DefenderLost),
            GameStatus::DefenderWins => {}
        }
        if self.finality.is_blacklisted(&st, game) {
            return Err(RegistryError::Blacklisted);
        }
        if st.is_retired(game.created_at()) {
            return Err(RegistryError::Retired);
        }
        if !self.game_is_respected(&st, game) {
            return Err(RegistryError::NotRespected);
        }
        if !self.finality.is_finalized(&st, game, now)? {
            return Err(RegistryError::NotFinalized);
        }
        let anchor_seq = st.anchor.proposal.sequence_number();
        if game.sequence_number() <= anchor_seq {
            return Err(RegistryError::SequenceNotAdvancing {
                proposed: game.sequence_number(),
                anchor: anchor_seq,
            });
        }

        let proposal = Proposal::new(game.sequence_number(), game.root_claim());
        st.anchor = Anchor {
            proposal,
            game: Some(game.game_id()),
        };
        info!(
            sequence = proposal.sequence_number(),
            game = %game.game_id(),
            "anchor updated"
        );
        st.push_event(RegistryEvent::AnchorUpdated {
            proposal,
            game: game.game_id(),
        });
        Ok(())
    }

    /// Recovery entry point for a mechanism found unsound, invoked by a
    /// game of that mechanism.
    ///
    /// Only a game that is itself currently respected may demote its own
    /// mechanism; an unrespected mechanism cannot nullify. If the
    /// mechanism sat in the active policy and a backup policy exists, the
    /// policy degrades wholesale to the backup list (threshold clamped to
    /// its length). Otherwise trust moves to the single backup mechanism.
    pub fn nullify(&self, game: &dyn DisputeGame, now: Timestamp) -> RegistryResult<()> {
        let mut st = self.state.write();

        let game_id = game.game_id();
        let Some(record) = st.registered.get(&game_id) else {
            return Err(RegistryError::UnknownGame(game_id));
        };

        // judge by the mechanism recorded at registration, not whatever
        // the caller declares now
        let mechanism = record.mechanism;
        let in_policy = st.specs.iter().any(|s| s.mechanism() == mechanism);
        if !in_policy && !self.respected_rule.is_respected(st.respected_mechanism, game) {
            return Err(RegistryError::NotRespected);
        }

        if in_policy && !st.backup_specs.is_empty() {
            st.specs = st.backup_specs.clone();
            let len = st.specs.len() as u32;
            if st.threshold > len {
                st.threshold = len;
            }
        } else {
            let Some(backup) = st.backup_mechanism else {
                return Err(RegistryError::NoBackupConfigured);
            };
            st.respected_mechanism = backup;
        }

        st.retirement_timestamp = Some(now);
        warn!(%mechanism, game = %game_id, "mechanism nullified");
        st.push_event(RegistryEvent::SoundnessIssue {
            game: game_id,
            mechanism,
        });
        Ok(())
    }

    // --- internal ---

    fn ensure_guardian(&self, caller: &ActorId) -> RegistryResult<()> {
        if !self.guardian.is_guardian(caller) {
            return Err(RegistryError::Unauthorized);
        }
        Ok(())
    }

    /// Anchoring respect: the pluggable mechanism-level test, plus the
    /// creation-time snapshot for aggregated games (an aggregated game
    /// whose mechanism list did not match the policy when it was created
    /// never becomes an anchor).
    fn game_is_respected(&self, st: &RegistryState, game: &dyn DisputeGame) -> bool {
        if !self.respected_rule.is_respected(st.respected_mechanism, game) {
            return false;
        }
        match game.as_aggregated() {
            Some(agg) => agg.snapshot().was_respected_at_creation(),
            None => true,
        }
    }
}

impl std::fmt::Debug for AnchorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.read();
        f.debug_struct("AnchorRegistry")
            .field("anchor", &st.anchor)
            .field("respected_mechanism", &st.respected_mechanism)
            .field("threshold", &st.threshold)
            .field("paused", &st.paused)
            .finish_non_exhaustive()
    }
}
