//! Ledger configuration

use pc_03_consensus::ConsensusConfig;
use serde::Deserialize;

/// Configuration for the ledger and the scheduler it owns
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Gas limit of the genesis block and the default for produced blocks
    pub block_gas_limit: u64,
    pub consensus: ConsensusConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            block_gas_limit: 8_000_000,
            consensus: ConsensusConfig::default(),
        }
    }
}

impl LedgerConfig {
    pub fn for_testing() -> Self {
        Self {
            block_gas_limit: 1_000_000,
            consensus: ConsensusConfig::for_testing(),
        }
    }
}
