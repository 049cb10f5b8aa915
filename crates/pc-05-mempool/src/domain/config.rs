//! Mempool configuration

use serde::Deserialize;

/// Mempool configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MempoolConfig {
    /// Upper bound on the summed `encoded_size` of pooled transactions.
    pub capacity_bytes: u64,
}

impl Default for MempoolConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: 32 * 1024 * 1024,
        }
    }
}

impl MempoolConfig {
    /// Small pool so capacity limits are easy to hit.
    pub fn for_testing() -> Self {
        Self {
            capacity_bytes: 4 * 1024,
        }
    }
}
