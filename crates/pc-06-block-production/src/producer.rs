//! Block producer service

use crate::config::ProducerConfig;
use crate::error::{ProductionError, ProductionResult};
use parking_lot::RwLock;
use pc_01_authority::Authority;
use pc_02_block::Block;
use pc_03_consensus::ConsensusError;
use pc_04_ledger::Ledger;
use pc_05_mempool::Mempool;
use poa_telemetry::subsystem_span;
use serde::Serialize;
use shared_types::{short_hex, Address, Hash, TimeSource, Timestamp, ZERO_HASH};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn, Instrument};

/// Result of one production attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductionOutcome {
    /// The turn belongs to a validator this producer cannot sign for.
    NotOurTurn { holder: Address },
    /// The block interval has not elapsed yet.
    Waiting { remaining_ms: u64 },
    /// The turn holder was skipped and charged a miss.
    MissRecorded { validator: Address, penalized: bool },
    /// A block was appended to the ledger.
    Produced {
        height: u64,
        hash: Hash,
        transactions: usize,
    },
}

/// Production counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProducerStats {
    pub blocks_produced: u64,
    pub misses_recorded: u64,
    pub transactions_included: u64,
    pub transactions_evicted: u64,
}

#[derive(Default)]
struct Counters {
    blocks_produced: AtomicU64,
    misses_recorded: AtomicU64,
    transactions_included: AtomicU64,
    transactions_evicted: AtomicU64,
}

/// Drives the ledger: on each attempt checks whose turn it is, packs the
/// best paying transactions into a block and appends it.
pub struct BlockProducer {
    ledger: Arc<Ledger>,
    mempool: Arc<Mempool>,
    config: ProducerConfig,
    signers: RwLock<HashMap<Address, Arc<Authority>>>,
    /// When the last miss was charged; a skipped turn opens at that moment.
    last_miss_at: RwLock<Timestamp>,
    counters: Counters,
}

impl BlockProducer {
    pub fn new(ledger: Arc<Ledger>, mempool: Arc<Mempool>, config: ProducerConfig) -> Self {
        Self {
            ledger,
            mempool,
            config,
            signers: RwLock::new(HashMap::new()),
            last_miss_at: RwLock::new(0),
            counters: Counters::default(),
        }
    }

    /// Produce blocks on behalf of `authority` when it holds the turn.
    pub fn register_signer(&self, authority: Arc<Authority>) -> ProductionResult<()> {
        if !authority.can_sign() {
            return Err(ProductionError::SignerWithoutKey(*authority.address()));
        }
        info!(signer = %short_hex(authority.address()), "Signer registered");
        self.signers.write().insert(*authority.address(), authority);
        Ok(())
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    pub fn stats(&self) -> ProducerStats {
        ProducerStats {
            blocks_produced: self.counters.blocks_produced.load(Ordering::Relaxed),
            misses_recorded: self.counters.misses_recorded.load(Ordering::Relaxed),
            transactions_included: self.counters.transactions_included.load(Ordering::Relaxed),
            transactions_evicted: self.counters.transactions_evicted.load(Ordering::Relaxed),
        }
    }

    /// Make one production attempt.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn produce_once(&self) -> ProductionResult<ProductionOutcome> {
        let scheduler = self.ledger.scheduler();
        let holder = scheduler
            .turn_holder()
            .ok_or(ConsensusError::NoValidators)?;

        let now = self.ledger.time_source().now();
        let interval = scheduler.block_interval();
        let elapsed = now.saturating_sub(scheduler.last_block_time());
        if elapsed < interval {
            return Ok(ProductionOutcome::Waiting {
                remaining_ms: interval - elapsed,
            });
        }

        if !holder.is_active() {
            debug!(holder = %short_hex(holder.address()), status = ?holder.status(), "Skipping inactive turn holder");
            return self.charge_miss(holder.address(), now);
        }

        let signer = self.signers.read().get(holder.address()).cloned();
        let Some(signer) = signer else {
            let opened_at = (scheduler.last_block_time() + interval).max(*self.last_miss_at.read());
            if now.saturating_sub(opened_at) >= self.config.validator_timeout_ms {
                return self.charge_miss(holder.address(), now);
            }
            return Ok(ProductionOutcome::NotOurTurn {
                holder: *holder.address(),
            });
        };

        self.produce_block(&signer, now)
    }

    /// Charge `validator` with a miss. Fails without charging anyone if the
    /// turn moved on since it was read.
    fn charge_miss(&self, validator: &Address, now: Timestamp) -> ProductionResult<ProductionOutcome> {
        let transition = self.ledger.record_missed_turn(validator)?;
        *self.last_miss_at.write() = now;
        self.counters.misses_recorded.fetch_add(1, Ordering::Relaxed);

        warn!(validator = %short_hex(validator), "Turn holder missed its slot");
        Ok(ProductionOutcome::MissRecorded {
            validator: *validator,
            penalized: transition.is_some(),
        })
    }

    fn produce_block(&self, signer: &Authority, now: Timestamp) -> ProductionResult<ProductionOutcome> {
        let tip = self.ledger.latest_block();
        let gas_limit = self
            .config
            .block_gas_limit
            .unwrap_or(self.ledger.config().block_gas_limit);

        let mut block = Block::new(tip.height() + 1, tip.hash(), ZERO_HASH, gas_limit, now, signer)?;

        let mut included = Vec::new();
        let mut evicted = 0u64;
        for tx in self.mempool.select_for_block(gas_limit) {
            let hash = tx.hash;
            match block.add_transaction(tx) {
                Ok(()) => included.push(hash),
                Err(error) => {
                    warn!(tx = %short_hex(&hash), %error, "Evicting transaction that failed block insertion");
                    self.mempool.remove(&hash);
                    evicted += 1;
                }
            }
        }
        self.counters
            .transactions_evicted
            .fetch_add(evicted, Ordering::Relaxed);

        block.sign(signer)?;
        let block = self.ledger.append_block(block)?;
        self.mempool.remove_included(&included);

        self.counters.blocks_produced.fetch_add(1, Ordering::Relaxed);
        self.counters
            .transactions_included
            .fetch_add(included.len() as u64, Ordering::Relaxed);

        Ok(ProductionOutcome::Produced {
            height: block.height(),
            hash: block.hash(),
            transactions: included.len(),
        })
    }

    /// Poll [`BlockProducer::produce_once`] until `shutdown` turns true or
    /// its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let span = subsystem_span!("block_producer", subsystem = "block-production");
        async move {
            let mut ticker =
                tokio::time::interval(Duration::from_millis(self.config.poll_interval_ms.max(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(poll_interval_ms = self.config.poll_interval_ms, "Block producer started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => match self.produce_once() {
                        Ok(ProductionOutcome::Produced { height, hash, transactions }) => {
                            debug!(height, hash = %short_hex(&hash), transactions, "Produced block");
                        }
                        Ok(_) => {}
                        Err(error) => warn!(%error, "Block production attempt failed"),
                    },
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            info!(stats = ?self.stats(), "Block producer stopped");
        }
        .instrument(span)
        .await
    }
}
