//! Deployment configuration for the anchor registry.

use accord_game_types::{check_spec_list, MechanismSpec, PolicyError, QuorumPolicy};
use accord_primitives::{MechanismId, Proposal};
use serde::{Deserialize, Serialize};

use crate::errors::{RegistryError, RegistryResult};

/// Everything needed to bring up a registry: the genesis anchor, the
/// aggregator's mechanism id, the initial quorum policy, finality delays
/// and the backup configuration. Loadable from TOML.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RegistryParams {
    pub aggregator_mechanism: MechanismId,

    /// The anchor the registry starts from. Everything a game disputes
    /// must advance past this.
    pub genesis_anchor: Proposal,

    /// Applied to mechanisms without an explicit delay entry, seconds.
    pub default_finality_delay: u64,

    #[serde(default)]
    pub finality_delays: Vec<FinalityDelayEntry>,

    pub policy: PolicyParams,

    #[serde(default)]
    pub backup: Option<BackupParams>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FinalityDelayEntry {
    pub mechanism: MechanismId,
    pub delay: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PolicyParams {
    pub mechanisms: Vec<MechanismSpec>,
    pub threshold: u32,
}

/// Fallback trust configuration installed by nullification.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BackupParams {
    /// Single mechanism to respect when no backup policy applies.
    pub mechanism: MechanismId,

    /// Replacement policy mechanism list; may be empty.
    #[serde(default)]
    pub mechanisms: Vec<MechanismSpec>,
}

impl RegistryParams {
    /// Validates the whole configuration before a registry is built from
    /// it.
    pub fn check_well_formed(&self) -> RegistryResult<()> {
        if self.default_finality_delay == 0 {
            return Err(RegistryError::ZeroFinalityDelay);
        }
        for entry in &self.finality_delays {
            if entry.delay == 0 {
                return Err(RegistryError::ZeroFinalityDelay);
            }
            if entry.mechanism == self.aggregator_mechanism {
                return Err(RegistryError::AggregatorDelay(entry.mechanism));
            }
        }

        self.initial_policy()
            .check_well_formed(self.aggregator_mechanism)?;

        if let Some(backup) = &self.backup {
            if backup.mechanism == self.aggregator_mechanism {
                return Err(PolicyError::AggregatorInList(backup.mechanism).into());
            }
            if !backup.mechanisms.is_empty() {
                check_spec_list(&backup.mechanisms, self.aggregator_mechanism)?;
            }
        }

        Ok(())
    }

    pub fn initial_policy(&self) -> QuorumPolicy {
        QuorumPolicy::new(self.policy.mechanisms.clone(), self.policy.threshold)
    }
}
