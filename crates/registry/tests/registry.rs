//! Behavioral tests for the anchor registry against mock games.

// These crates are used by the library target but not this integration test;
// silence `unused_crate_dependencies` for this target.
use parking_lot as _;
use serde as _;
use thiserror as _;
use tracing as _;

use std::sync::Arc;

use accord_game_types::{DisputeGame, MechanismSpec, QuorumPolicy};
use accord_primitives::{
    mechanism::{FAULT_PROOF, QUORUM, TEE_ATTEST, ZK_PROOF},
    Buf32, GameStatus, Proposal,
};
use accord_registry::{
    AnchorRegistry, BackupParams, FinalityDelayEntry, PolicyParams, RegistryError, RegistryEvent,
    RegistryParams,
};
use accord_test_utils::{actor, MockGame, StaticGuardian};

const GUARDIAN: u8 = 7;
const STRANGER: u8 = 9;

fn base_specs() -> Vec<MechanismSpec> {
    vec![
        MechanismSpec::new(ZK_PROOF, false),
        MechanismSpec::new(TEE_ATTEST, false),
        MechanismSpec::new(FAULT_PROOF, false),
    ]
}

fn backup_specs() -> Vec<MechanismSpec> {
    vec![
        MechanismSpec::new(ZK_PROOF, true),
        MechanismSpec::new(TEE_ATTEST, false),
    ]
}

fn params(backup: Option<BackupParams>) -> RegistryParams {
    RegistryParams {
        aggregator_mechanism: QUORUM,
        genesis_anchor: Proposal::new(10, Buf32::zero()),
        default_finality_delay: 100,
        finality_delays: vec![FinalityDelayEntry {
            mechanism: ZK_PROOF,
            delay: 50,
        }],
        policy: PolicyParams {
            mechanisms: base_specs(),
            threshold: 2,
        },
        backup,
    }
}

fn registry() -> AnchorRegistry {
    let guardian = Arc::new(StaticGuardian::new(actor(GUARDIAN)));
    AnchorRegistry::new(
        params(Some(BackupParams {
            mechanism: ZK_PROOF,
            mechanisms: backup_specs(),
        })),
        guardian,
    )
    .unwrap()
}

#[test]
fn test_guardian_gating() {
    let reg = registry();
    let stranger = actor(STRANGER);

    assert_eq!(
        reg.set_threshold(&stranger, 3),
        Err(RegistryError::Unauthorized)
    );
    assert_eq!(
        reg.set_finality_delay(&stranger, TEE_ATTEST, 5),
        Err(RegistryError::Unauthorized)
    );
    assert_eq!(reg.set_paused(&stranger, true), Err(RegistryError::Unauthorized));
    assert!(reg.events().is_empty());
}

#[test]
fn test_threshold_setter_invariants() {
    let reg = registry();
    let guardian = actor(GUARDIAN);

    assert!(reg.set_threshold(&guardian, 3).is_ok());
    assert!(reg.set_threshold(&guardian, 0).is_err());
    assert!(reg.set_threshold(&guardian, 4).is_err());
    assert_eq!(reg.live_policy().threshold(), 3);
    assert_eq!(
        reg.events().last(),
        Some(&RegistryEvent::ThresholdSet { threshold: 3 })
    );
}

#[test]
fn test_policy_setter_enforces_invariants() {
    let reg = registry();
    let guardian = actor(GUARDIAN);

    // ascending list is rejected before any mutation
    let mut ascending = base_specs();
    ascending.reverse();
    assert!(reg
        .set_policy(&guardian, QuorumPolicy::new(ascending, 2))
        .is_err());
    assert_eq!(reg.live_policy().mechanism_ids(), vec![ZK_PROOF, TEE_ATTEST, FAULT_PROOF]);

    let replacement = QuorumPolicy::new(backup_specs(), 1);
    reg.set_policy(&guardian, replacement.clone()).unwrap();
    assert_eq!(reg.live_policy(), replacement);
}

#[test]
fn test_finality_delay_setter() {
    let reg = registry();
    let guardian = actor(GUARDIAN);

    assert_eq!(
        reg.set_finality_delay(&guardian, TEE_ATTEST, 0),
        Err(RegistryError::ZeroFinalityDelay)
    );
    assert_eq!(
        reg.set_finality_delay(&guardian, QUORUM, 10),
        Err(RegistryError::AggregatorDelay(QUORUM))
    );

    reg.set_finality_delay(&guardian, TEE_ATTEST, 30).unwrap();
    assert_eq!(reg.finality_delay(TEE_ATTEST), 30);
    // unset mechanisms fall back to the default
    assert_eq!(reg.finality_delay(FAULT_PROOF), 100);
}

#[test]
fn test_finality_is_strict_elapsed() {
    let reg = registry();
    let game = MockGame::new(ZK_PROOF, 11, Buf32::new([1; 32]), 1000);

    assert_eq!(reg.is_finalized(game.as_ref(), 5000), Ok(false));

    game.resolve(GameStatus::DefenderWins, 2000);
    // ZK delay is 50; the boundary instant is not yet final
    assert_eq!(reg.is_finalized(game.as_ref(), 2050), Ok(false));
    assert_eq!(reg.is_finalized(game.as_ref(), 2051), Ok(true));
}

#[test]
fn test_set_anchor_rejections() {
    let reg = registry();
    let guardian = actor(GUARDIAN);

    // respected mechanism is the aggregator; a mock declaring it exercises
    // the non-aggregated path
    let game = MockGame::new(QUORUM, 11, Buf32::new([2; 32]), 1000);
    assert_eq!(
        reg.set_anchor(game.as_ref(), 2000),
        Err(RegistryError::NotResolved)
    );

    game.resolve(GameStatus::ChallengerWins, 2000);
    assert_eq!(
        reg.set_anchor(game.as_ref(), 3000),
        Err(RegistryError::DefenderLost)
    );

    let won = MockGame::new(QUORUM, 11, Buf32::new([3; 32]), 1000);
    won.resolve(GameStatus::DefenderWins, 2000);
    assert_eq!(
        reg.set_anchor(won.as_ref(), 2001),
        Err(RegistryError::NotFinalized)
    );

    reg.blacklist_game(&guardian, won.game_id()).unwrap();
    assert_eq!(
        reg.set_anchor(won.as_ref(), 9000),
        Err(RegistryError::Blacklisted)
    );

    // a disrespected mechanism cannot anchor
    let other = MockGame::new(FAULT_PROOF, 12, Buf32::new([4; 32]), 1000);
    other.resolve(GameStatus::DefenderWins, 2000);
    assert_eq!(
        reg.set_anchor(other.as_ref(), 9000),
        Err(RegistryError::NotRespected)
    );
}

#[test]
fn test_monotonic_anchor() {
    let reg = registry();

    // genesis anchor sits at sequence 10; an otherwise-finalized game at
    // the same sequence must be rejected
    let stale = MockGame::new(QUORUM, 10, Buf32::new([5; 32]), 1000);
    stale.resolve(GameStatus::DefenderWins, 2000);
    assert_eq!(
        reg.set_anchor(stale.as_ref(), 90_000),
        Err(RegistryError::SequenceNotAdvancing {
            proposed: 10,
            anchor: 10
        })
    );

    let fresh = MockGame::new(QUORUM, 11, Buf32::new([6; 32]), 1000);
    fresh.resolve(GameStatus::DefenderWins, 2000);
    reg.set_anchor(fresh.as_ref(), 90_000).unwrap();

    let anchor = reg.anchor();
    assert_eq!(anchor.proposal.sequence_number(), 11);
    assert_eq!(anchor.game, Some(fresh.game_id()));
    assert!(matches!(
        reg.events().last(),
        Some(RegistryEvent::AnchorUpdated { .. })
    ));
}

#[test]
fn test_nullify_requires_registration() {
    let reg = registry();
    let game = MockGame::new(ZK_PROOF, 11, Buf32::new([7; 32]), 1000);
    assert!(matches!(
        reg.nullify(game.as_ref(), 2000),
        Err(RegistryError::UnknownGame(_))
    ));
}

#[test]
fn test_nullify_installs_backup_policy() {
    let reg = registry();
    let guardian = actor(GUARDIAN);
    // raise the threshold so the clamp is observable
    reg.set_threshold(&guardian, 3).unwrap();

    let game = MockGame::new(TEE_ATTEST, 11, Buf32::new([8; 32]), 1000);
    reg.register_game(game.as_ref());
    reg.nullify(game.as_ref(), 5000).unwrap();

    let policy = reg.live_policy();
    assert_eq!(policy.mechanism_ids(), vec![ZK_PROOF, TEE_ATTEST]);
    assert_eq!(policy.required_ids(), vec![ZK_PROOF]);
    assert_eq!(policy.threshold(), 2, "threshold clamped to backup length");
    assert_eq!(reg.retirement_timestamp(), Some(5000));
    // the aggregator stays respected; only the policy degraded
    assert_eq!(reg.respected_mechanism(), QUORUM);
    assert!(matches!(
        reg.events().last(),
        Some(RegistryEvent::SoundnessIssue { mechanism, .. }) if *mechanism == TEE_ATTEST
    ));

    // a mechanism outside the degraded policy can no longer nullify
    let late = MockGame::new(FAULT_PROOF, 12, Buf32::new([9; 32]), 6000);
    reg.register_game(late.as_ref());
    assert_eq!(
        reg.nullify(late.as_ref(), 7000),
        Err(RegistryError::NotRespected)
    );
}

#[test]
fn test_nullify_single_mechanism_fallback() {
    // no backup policy list configured, only a backup mechanism
    let guardian = Arc::new(StaticGuardian::new(actor(GUARDIAN)));
    let reg = AnchorRegistry::new(
        params(Some(BackupParams {
            mechanism: ZK_PROOF,
            mechanisms: Vec::new(),
        })),
        guardian,
    )
    .unwrap();

    let game = MockGame::new(TEE_ATTEST, 11, Buf32::new([10; 32]), 1000);
    reg.register_game(game.as_ref());
    reg.nullify(game.as_ref(), 5000).unwrap();

    assert_eq!(reg.respected_mechanism(), ZK_PROOF);
    assert_eq!(reg.retirement_timestamp(), Some(5000));
    // policy changes are locked once the aggregator is demoted
    assert_eq!(
        reg.set_policy(&actor(GUARDIAN), QuorumPolicy::new(base_specs(), 2)),
        Err(RegistryError::PolicyLocked)
    );
}

#[test]
fn test_nullify_without_backup_fails() {
    let guardian = Arc::new(StaticGuardian::new(actor(GUARDIAN)));
    let reg = AnchorRegistry::new(params(None), guardian).unwrap();

    // outside the policy entirely: not respected
    let rogue = MockGame::new(QUORUM, 11, Buf32::new([11; 32]), 1000);
    reg.register_game(rogue.as_ref());
    // aggregator mechanism matches the respected id, so the respected
    // check passes but there is nothing to fall back to
    assert_eq!(
        reg.nullify(rogue.as_ref(), 5000),
        Err(RegistryError::NoBackupConfigured)
    );
    assert_eq!(reg.retirement_timestamp(), None);
}

#[test]
fn test_retired_games_cannot_anchor() {
    let reg = registry();

    let nullifier = MockGame::new(TEE_ATTEST, 11, Buf32::new([12; 32]), 1000);
    reg.register_game(nullifier.as_ref());
    reg.nullify(nullifier.as_ref(), 5000).unwrap();

    // created before retirement: ineligible even though finalized
    let old = MockGame::new(QUORUM, 12, Buf32::new([13; 32]), 4000);
    old.resolve(GameStatus::DefenderWins, 6000);
    assert_eq!(
        reg.set_anchor(old.as_ref(), 90_000),
        Err(RegistryError::Retired)
    );

    // created after retirement: fine
    let fresh = MockGame::new(QUORUM, 12, Buf32::new([14; 32]), 5000);
    fresh.resolve(GameStatus::DefenderWins, 6000);
    reg.set_anchor(fresh.as_ref(), 90_000).unwrap();
}

#[test]
fn test_registry_from_toml_config() {
    let raw = r#"
        aggregator_mechanism = 64
        default_finality_delay = 100

        [genesis_anchor]
        sequence_number = 10
        claimed_root = "0000000000000000000000000000000000000000000000000000000000000000"

        [policy]
        threshold = 2
        mechanisms = [
            { mechanism = 3, required = false },
            { mechanism = 2, required = false },
            { mechanism = 1, required = false },
        ]
    "#;
    let params: RegistryParams = toml::from_str(raw).unwrap();
    let guardian = Arc::new(StaticGuardian::new(actor(GUARDIAN)));
    let reg = AnchorRegistry::new(params, guardian).unwrap();

    assert_eq!(reg.aggregator_id(), QUORUM);
    assert_eq!(reg.anchor().proposal.sequence_number(), 10);
    assert_eq!(reg.live_policy().threshold(), 2);

    let game = MockGame::new(QUORUM, 11, Buf32::new([21; 32]), 1000);
    game.resolve(GameStatus::DefenderWins, 2000);
    reg.set_anchor(game.as_ref(), 2101).unwrap();
    assert_eq!(reg.anchor().proposal.sequence_number(), 11);
}

#[test]
fn test_pause_flag() {
    let reg = registry();
    let guardian = actor(GUARDIAN);

    assert!(!reg.is_paused());
    reg.set_paused(&guardian, true).unwrap();
    assert!(reg.is_paused());
    assert_eq!(
        reg.events().last(),
        Some(&RegistryEvent::PausedSet { paused: true })
    );
}
