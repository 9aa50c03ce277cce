//! Quorum policy types and their invariants.

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use accord_primitives::MechanismId;

use crate::errors::PolicyError;

/// One mechanism's role within a quorum policy.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Arbitrary,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct MechanismSpec {
    mechanism: MechanismId,
    required: bool,
}

impl MechanismSpec {
    pub fn new(mechanism: MechanismId, required: bool) -> Self {
        Self {
            mechanism,
            required,
        }
    }

    pub fn mechanism(&self) -> MechanismId {
        self.mechanism
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Checks that a mechanism list is strictly descending and does not
/// contain the aggregator's own id.
///
/// Strict descent is the canonicalization rule: two orderings of the same
/// set must not produce distinct game identities.
pub fn check_mechanism_list(
    ids: &[MechanismId],
    aggregator: MechanismId,
) -> Result<(), PolicyError> {
    let mut prev: Option<MechanismId> = None;
    for id in ids {
        if *id == aggregator {
            return Err(PolicyError::AggregatorInList(*id));
        }
        if let Some(p) = prev {
            if *id >= p {
                return Err(PolicyError::NotDescending(*id));
            }
        }
        prev = Some(*id);
    }
    Ok(())
}

/// The active quorum rules: which mechanisms participate, which of them
/// are required, and how many defender votes decide.
#[derive(Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct QuorumPolicy {
    specs: Vec<MechanismSpec>,
    threshold: u32,
}

impl QuorumPolicy {
    pub fn new(specs: Vec<MechanismSpec>, threshold: u32) -> Self {
        Self { specs, threshold }
    }

    /// Validates all policy invariants against the given aggregator id.
    pub fn check_well_formed(&self, aggregator: MechanismId) -> Result<(), PolicyError> {
        check_spec_list(&self.specs, aggregator)?;
        check_threshold(self.threshold, &self.specs)?;
        Ok(())
    }

    pub fn specs(&self) -> &[MechanismSpec] {
        &self.specs
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn mechanism_ids(&self) -> Vec<MechanismId> {
        self.specs.iter().map(|s| s.mechanism()).collect()
    }

    pub fn required_ids(&self) -> Vec<MechanismId> {
        self.specs
            .iter()
            .filter(|s| s.is_required())
            .map(|s| s.mechanism())
            .collect()
    }

    pub fn required_count(&self) -> u32 {
        self.specs.iter().filter(|s| s.is_required()).count() as u32
    }

    pub fn contains(&self, mechanism: MechanismId) -> bool {
        self.specs.iter().any(|s| s.mechanism() == mechanism)
    }
}

/// Validates a spec list: arity, strict descent, aggregator exclusion.
pub fn check_spec_list(
    specs: &[MechanismSpec],
    aggregator: MechanismId,
) -> Result<(), PolicyError> {
    if specs.len() < 2 {
        return Err(PolicyError::NotEnoughMechanisms(specs.len()));
    }
    let ids: Vec<MechanismId> = specs.iter().map(|s| s.mechanism()).collect();
    check_mechanism_list(&ids, aggregator)
}

/// Validates a threshold against a spec list.
pub fn check_threshold(threshold: u32, specs: &[MechanismSpec]) -> Result<(), PolicyError> {
    if threshold == 0 {
        return Err(PolicyError::ZeroThreshold);
    }
    if threshold as usize > specs.len() {
        return Err(PolicyError::ThresholdTooHigh {
            threshold,
            len: specs.len(),
        });
    }
    let required = specs.iter().filter(|s| s.is_required()).count() as u32;
    if threshold < required {
        return Err(PolicyError::ThresholdBelowRequired {
            threshold,
            required,
        });
    }
    Ok(())
}

/// The quorum rules a game was created under, fixed for its lifetime.
///
/// Later changes to the live policy never reach in-flight games; the
/// registry judges a quorum game by this snapshot.
#[derive(Clone, Debug, Eq, PartialEq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct PolicySnapshot {
    threshold: u32,
    required: Vec<MechanismId>,
    respected: bool,
}

impl PolicySnapshot {
    /// Snapshot for a game whose mechanism list matched the live policy at
    /// creation.
    pub fn respected(threshold: u32, required: Vec<MechanismId>) -> Self {
        Self {
            threshold,
            required,
            respected: true,
        }
    }

    /// Snapshot for a game created against a non-matching live policy: it
    /// runs to completion under unanimity but is not anchor-eligible.
    pub fn unprivileged(mechanism_count: u32) -> Self {
        Self {
            threshold: mechanism_count,
            required: Vec::new(),
            respected: false,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn is_required(&self, mechanism: MechanismId) -> bool {
        self.required.contains(&mechanism)
    }

    pub fn required_ids(&self) -> &[MechanismId] {
        &self.required
    }

    pub fn was_respected_at_creation(&self) -> bool {
        self.respected
    }
}
