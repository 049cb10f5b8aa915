//! Scheduler configuration

use serde::Deserialize;

/// Configuration for the round-robin scheduler
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Minimum time between consecutive blocks (milliseconds)
    pub block_interval_ms: u64,
    /// Consecutive misses after which a validator is penalized
    pub max_consecutive_misses: u64,
    /// Active validators required for the chain to be considered live
    pub min_active_validators: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            block_interval_ms: 100,
            max_consecutive_misses: 3,
            min_active_validators: 1,
        }
    }
}

impl ConsensusConfig {
    /// Short interval for tests driven by a manual clock.
    pub fn for_testing() -> Self {
        Self {
            block_interval_ms: 10,
            max_consecutive_misses: 2,
            min_active_validators: 1,
        }
    }
}
