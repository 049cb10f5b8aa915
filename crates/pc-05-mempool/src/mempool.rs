//! Thread-safe mempool service

use crate::domain::{MempoolConfig, MempoolResult, MempoolStatus, TransactionPool};
use parking_lot::RwLock;
use shared_types::{short_hex, Address, Hash, Transaction};
use tracing::{debug, warn};

/// Shared pending-transaction store.
///
/// Submitters take the write lock briefly; [`Mempool::select_for_block`]
/// holds only a read lock while it copies the heap.
#[derive(Debug)]
pub struct Mempool {
    pool: RwLock<TransactionPool>,
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new(MempoolConfig::default())
    }
}

impl Mempool {
    pub fn new(config: MempoolConfig) -> Self {
        Self {
            pool: RwLock::new(TransactionPool::new(config)),
        }
    }

    /// Admit a pending transaction.
    pub fn add(&self, tx: Transaction) -> MempoolResult<()> {
        let hash = tx.hash;
        let sender = tx.from;
        let nonce = tx.nonce;

        match self.pool.write().add(tx) {
            Ok(()) => {
                debug!(
                    tx = %short_hex(&hash),
                    sender = %short_hex(&sender),
                    nonce,
                    "Transaction added to mempool"
                );
                Ok(())
            }
            Err(error) => {
                warn!(tx = %short_hex(&hash), %error, "Transaction rejected by mempool");
                Err(error)
            }
        }
    }

    /// Remove a transaction. No-op if absent.
    pub fn remove(&self, hash: &Hash) -> Option<Transaction> {
        self.pool.write().remove(hash)
    }

    /// Remove every listed transaction under one write lock.
    ///
    /// Returns how many were present.
    pub fn remove_included<'a, I>(&self, hashes: I) -> usize
    where
        I: IntoIterator<Item = &'a Hash>,
    {
        let mut pool = self.pool.write();
        let removed = hashes
            .into_iter()
            .filter(|hash| pool.remove(hash).is_some())
            .count();
        debug!(removed, remaining = pool.len(), "Included transactions removed");
        removed
    }

    /// Highest-paying transactions whose gas limits fit `gas_budget`.
    pub fn select_for_block(&self, gas_budget: u64) -> Vec<Transaction> {
        self.pool.read().select_for_block(gas_budget)
    }

    pub fn pending_nonce(&self, sender: &Address) -> u64 {
        self.pool.read().pending_nonce(sender)
    }

    pub fn transaction(&self, hash: &Hash) -> Option<Transaction> {
        self.pool.read().get(hash).cloned()
    }

    pub fn transactions_from(&self, sender: &Address) -> Vec<Transaction> {
        self.pool.read().transactions_from(sender)
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.pool.read().contains(hash)
    }

    pub fn len(&self) -> usize {
        self.pool.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.read().is_empty()
    }

    pub fn size_bytes(&self) -> u64 {
        self.pool.read().size_bytes()
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.pool.read().config().capacity_bytes
    }

    pub fn clear(&self) {
        self.pool.write().clear();
    }

    pub fn status(&self) -> MempoolStatus {
        self.pool.read().status()
    }
}
