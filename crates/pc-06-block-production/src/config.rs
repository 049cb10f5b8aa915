//! Configuration types for block production

use serde::Deserialize;

/// Runtime configuration for the block producer
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Delay between production attempts in [`crate::BlockProducer::run`]
    pub poll_interval_ms: u64,

    /// Grace period after a turn opens before an absent holder is charged a miss
    pub validator_timeout_ms: u64,

    /// Gas limit for produced blocks; the ledger's limit when unset
    pub block_gas_limit: Option<u64>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            validator_timeout_ms: 1_000,
            block_gas_limit: None,
        }
    }
}

impl ProducerConfig {
    pub fn for_testing() -> Self {
        Self {
            poll_interval_ms: 5,
            validator_timeout_ms: 50,
            block_gas_limit: None,
        }
    }
}
