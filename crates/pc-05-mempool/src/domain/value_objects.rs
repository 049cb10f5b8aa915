//! Value objects for the Mempool subsystem.

use serde::Serialize;
use shared_types::{Hash, U256};
use std::cmp::Ordering;

/// Heap entry referencing a pooled transaction by hash.
///
/// Ordered by gas price ascending, then hash descending, so a max-heap pops
/// the highest gas price first and the smaller hash first among equals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PricedTransaction {
    pub gas_price: U256,
    pub hash: Hash,
}

impl PricedTransaction {
    pub fn new(gas_price: U256, hash: Hash) -> Self {
        Self { gas_price, hash }
    }
}

impl Ord for PricedTransaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gas_price
            .cmp(&other.gas_price)
            .then_with(|| other.hash.cmp(&self.hash))
    }
}

impl PartialOrd for PricedTransaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Point-in-time summary of the pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MempoolStatus {
    /// Number of pending transactions.
    pub pending_count: usize,
    /// Distinct senders with at least one pending transaction.
    pub sender_count: usize,
    /// Sum of pending gas limits.
    pub total_gas: u64,
    pub size_bytes: u64,
    pub capacity_bytes: u64,
}
