//! # Transaction Pool
//!
//! Three indices over the same set of pending transactions:
//!
//! - `by_hash`: lookup by transaction hash
//! - `by_sender`: nonce-ordered hashes per sender
//! - `by_price`: binary max-heap keyed by gas price
//!
//! Removal is lazy for the heap: entries whose hash is no longer in
//! `by_hash` are skipped on selection and dropped on compaction.

use super::config::MempoolConfig;
use super::errors::{MempoolError, MempoolResult};
use super::value_objects::{MempoolStatus, PricedTransaction};
use shared_types::{Address, Hash, Transaction};
use std::collections::{BTreeMap, BinaryHeap, HashMap};

/// Transaction priority queue with multiple indices.
///
/// Not synchronized; [`crate::Mempool`] wraps it in a lock.
#[derive(Debug, Default)]
pub struct TransactionPool {
    config: MempoolConfig,

    /// All transactions indexed by hash.
    by_hash: HashMap<Hash, Transaction>,

    /// Transactions grouped by sender, ordered by nonce.
    by_sender: HashMap<Address, BTreeMap<u64, Hash>>,

    /// Gas price ordered heap. May hold stale entries.
    by_price: BinaryHeap<PricedTransaction>,

    /// Running sum of `encoded_size` over `by_hash`.
    size_bytes: u64,
}

impl TransactionPool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &MempoolConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn get(&self, hash: &Hash) -> Option<&Transaction> {
        self.by_hash.get(hash)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Adds a transaction to the pool.
    ///
    /// # Errors
    /// - `DuplicateTransaction` if the hash already exists
    /// - `DuplicateNonce` if the sender already has this nonce pending
    /// - `CapacityExceeded` if the pool would grow past `capacity_bytes`
    pub fn add(&mut self, tx: Transaction) -> MempoolResult<()> {
        if self.by_hash.contains_key(&tx.hash) {
            return Err(MempoolError::DuplicateTransaction(tx.hash));
        }

        let nonce_taken = self
            .by_sender
            .get(&tx.from)
            .is_some_and(|nonces| nonces.contains_key(&tx.nonce));
        if nonce_taken {
            return Err(MempoolError::DuplicateNonce {
                sender: tx.from,
                nonce: tx.nonce,
            });
        }

        let size = tx.encoded_size();
        if self.size_bytes.saturating_add(size) > self.config.capacity_bytes {
            return Err(MempoolError::CapacityExceeded {
                size,
                current: self.size_bytes,
                capacity: self.config.capacity_bytes,
            });
        }

        self.by_sender
            .entry(tx.from)
            .or_default()
            .insert(tx.nonce, tx.hash);
        self.by_price.push(PricedTransaction::new(tx.gas_price, tx.hash));
        self.size_bytes += size;
        self.by_hash.insert(tx.hash, tx);
        Ok(())
    }

    /// Removes a transaction from every index. Returns `None` if absent.
    pub fn remove(&mut self, hash: &Hash) -> Option<Transaction> {
        let tx = self.by_hash.remove(hash)?;

        if let Some(nonces) = self.by_sender.get_mut(&tx.from) {
            nonces.remove(&tx.nonce);
            if nonces.is_empty() {
                self.by_sender.remove(&tx.from);
            }
        }
        self.size_bytes -= tx.encoded_size();
        self.compact_if_sparse();
        Some(tx)
    }

    /// Transactions to pack into a block with `gas_budget`, best price first.
    ///
    /// Works on a copy of the heap. A transaction whose `gas_limit` does not
    /// fit the remaining budget is skipped and later ones are still tried.
    pub fn select_for_block(&self, gas_budget: u64) -> Vec<Transaction> {
        let mut heap = self.by_price.clone();
        let mut remaining = gas_budget;
        let mut selected = Vec::new();

        while let Some(entry) = heap.pop() {
            if remaining == 0 {
                break;
            }
            let Some(tx) = self.by_hash.get(&entry.hash) else {
                continue;
            };
            if tx.gas_limit <= remaining {
                remaining -= tx.gas_limit;
                selected.push(tx.clone());
            }
        }
        selected
    }

    /// One past the highest pending nonce for `sender`, or 0.
    pub fn pending_nonce(&self, sender: &Address) -> u64 {
        self.by_sender
            .get(sender)
            .and_then(|nonces| nonces.last_key_value())
            .map_or(0, |(nonce, _)| nonce + 1)
    }

    /// Pending transactions of `sender` in nonce order.
    pub fn transactions_from(&self, sender: &Address) -> Vec<Transaction> {
        self.by_sender
            .get(sender)
            .map(|nonces| {
                nonces
                    .values()
                    .filter_map(|hash| self.by_hash.get(hash).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.by_hash.clear();
        self.by_sender.clear();
        self.by_price.clear();
        self.size_bytes = 0;
    }

    pub fn status(&self) -> MempoolStatus {
        MempoolStatus {
            pending_count: self.by_hash.len(),
            sender_count: self.by_sender.len(),
            total_gas: self
                .by_hash
                .values()
                .fold(0u64, |acc, tx| acc.saturating_add(tx.gas_limit)),
            size_bytes: self.size_bytes,
            capacity_bytes: self.config.capacity_bytes,
        }
    }

    /// Rebuild the heap once stale entries outnumber live ones.
    fn compact_if_sparse(&mut self) {
        if self.by_price.len() > 2 * self.by_hash.len() + 16 {
            let by_hash = &self.by_hash;
            self.by_price.retain(|entry| by_hash.contains_key(&entry.hash));
        }
    }

    #[cfg(test)]
    pub(crate) fn heap_len(&self) -> usize {
        self.by_price.len()
    }
}
