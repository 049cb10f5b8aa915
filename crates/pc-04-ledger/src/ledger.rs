//! Ledger service

use crate::domain::{audit_chain, LedgerConfig, LedgerError, LedgerResult};
use parking_lot::RwLock;
use pc_01_authority::Authority;
use pc_02_block::Block;
use pc_03_consensus::{ConsensusError, RoundRobinScheduler, StatusTransition};
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{short_hex, Address, Hash, SystemTimeSource, TimeSource, Timestamp, ZERO_HASH};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Chain state guarded by the ledger lock
struct ChainState {
    blocks: Vec<Arc<Block>>,
    /// Block hash to height
    by_hash: HashMap<Hash, u64>,
    /// Registered validators
    validators: HashMap<Address, Arc<Authority>>,
    /// Removed validators, kept so historical blocks still audit
    retired: HashMap<Address, Arc<Authority>>,
    last_block_time: Timestamp,
}

impl ChainState {
    fn tip(&self) -> &Arc<Block> {
        // Genesis is appended at construction and blocks are never removed.
        &self.blocks[self.blocks.len() - 1]
    }

    fn push(&mut self, block: Arc<Block>) {
        self.by_hash.insert(block.hash(), block.height());
        self.last_block_time = block.timestamp();
        self.blocks.push(block);
    }

    fn authority_for_audit(&self, address: &Address) -> Option<Arc<Authority>> {
        self.validators
            .get(address)
            .or_else(|| self.retired.get(address))
            .cloned()
    }
}

/// Append-only Proof-of-Authority chain.
pub struct Ledger {
    chain: RwLock<ChainState>,
    scheduler: Arc<RoundRobinScheduler>,
    time_source: Arc<dyn TimeSource>,
    publisher: Option<Arc<dyn EventPublisher>>,
    config: LedgerConfig,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chain = self.chain.read();
        f.debug_struct("Ledger")
            .field("height", &chain.tip().height())
            .field("validators", &chain.validators.len())
            .field("retired", &chain.retired.len())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

impl Ledger {
    /// Create a chain whose genesis block is produced by `genesis`.
    pub fn new(genesis: Arc<Authority>, config: LedgerConfig) -> LedgerResult<Self> {
        Self::with_time_source(genesis, config, Arc::new(SystemTimeSource))
    }

    /// Create a chain with a custom clock (for testing).
    ///
    /// Signs a height-0 block with `genesis` at the current time, then
    /// registers `genesis` in the registry and the rotation and records the
    /// block as produced.
    pub fn with_time_source(
        genesis: Arc<Authority>,
        config: LedgerConfig,
        time_source: Arc<dyn TimeSource>,
    ) -> LedgerResult<Self> {
        // Sign before registering: a failed signature leaves `genesis` untouched.
        let now = time_source.now();
        let genesis_block = Block::new(0, ZERO_HASH, ZERO_HASH, config.block_gas_limit, now, &genesis)?;
        let genesis_hash = genesis_block.hash();

        let scheduler = Arc::new(RoundRobinScheduler::with_time_source(
            config.consensus.clone(),
            Arc::clone(&time_source),
        ));
        scheduler.add_validator(Arc::clone(&genesis))?;

        let mut chain = ChainState {
            blocks: Vec::new(),
            by_hash: HashMap::new(),
            validators: HashMap::new(),
            retired: HashMap::new(),
            last_block_time: now,
        };
        chain.validators.insert(*genesis.address(), genesis);
        chain.push(Arc::new(genesis_block));
        scheduler.record_block_production(now);

        info!(
            genesis = %short_hex(&genesis_hash),
            timestamp = now,
            "Ledger initialized"
        );

        Ok(Self {
            chain: RwLock::new(chain),
            scheduler,
            time_source,
            publisher: None,
            config,
        })
    }

    /// Publish ledger and scheduler events to `publisher`.
    pub fn with_event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.scheduler.set_event_publisher(Arc::clone(&publisher));
        self.publisher = Some(publisher);
        self
    }

    // === VALIDATOR REGISTRY ===

    /// Register a validator and append it to the rotation.
    pub fn add_validator(&self, authority: Arc<Authority>) -> LedgerResult<()> {
        let address = *authority.address();
        {
            let mut chain = self.chain.write();
            if chain.validators.contains_key(&address) {
                return Err(ConsensusError::DuplicateValidator(address).into());
            }
            self.scheduler.add_validator(Arc::clone(&authority))?;
            chain.retired.remove(&address);
            chain.validators.insert(address, authority);
        }

        info!(validator = %short_hex(&address), "Validator registered");
        self.publish(LedgerEvent::ValidatorAdded {
            address,
            timestamp: self.time_source.now(),
        });
        Ok(())
    }

    /// Deregister a validator and drop it from the rotation.
    ///
    /// The authority is retained for auditing blocks it produced.
    pub fn remove_validator(&self, address: &Address) -> LedgerResult<Arc<Authority>> {
        let removed = {
            let mut chain = self.chain.write();
            let authority = chain
                .validators
                .remove(address)
                .ok_or(LedgerError::UnknownValidator(*address))?;
            self.scheduler.remove_validator(address);
            chain.retired.insert(*address, Arc::clone(&authority));
            authority
        };

        info!(validator = %short_hex(address), "Validator deregistered");
        self.publish(LedgerEvent::ValidatorRemoved {
            address: *address,
            timestamp: self.time_source.now(),
        });
        Ok(removed)
    }

    // === APPEND ===

    /// Validate and append a candidate block.
    pub fn append_block(&self, candidate: Block) -> LedgerResult<Arc<Block>> {
        let producer = *candidate.validator_address();
        let height = candidate.height();
        let hash = candidate.hash();

        // Verify outside the write lock; reused below only for the same key.
        let pre_verified = self
            .validator(&producer)
            .map(|authority| {
                let valid = candidate.verify(&authority);
                (authority, valid)
            });

        match self.try_append(candidate, pre_verified) {
            Ok(block) => {
                info!(
                    height,
                    hash = %short_hex(&hash),
                    validator = %short_hex(&producer),
                    transactions = block.transactions().len(),
                    "Block appended"
                );
                self.publish(LedgerEvent::BlockAppended {
                    height,
                    hash,
                    validator: producer,
                    transaction_count: block.transactions().len(),
                    timestamp: block.timestamp(),
                });
                Ok(block)
            }
            Err(error) => {
                warn!(
                    height,
                    hash = %short_hex(&hash),
                    validator = %short_hex(&producer),
                    %error,
                    "Block rejected"
                );
                self.publish(LedgerEvent::BlockRejected {
                    height,
                    hash,
                    validator: producer,
                    reason: error.to_string(),
                    timestamp: self.time_source.now(),
                });
                Err(error)
            }
        }
    }

    fn try_append(
        &self,
        candidate: Block,
        pre_verified: Option<(Arc<Authority>, bool)>,
    ) -> LedgerResult<Arc<Block>> {
        let mut chain = self.chain.write();
        let producer = *candidate.validator_address();

        let authority = chain
            .validators
            .get(&producer)
            .cloned()
            .ok_or(LedgerError::UnknownValidator(producer))?;

        let tip = chain.tip();
        let expected_height = tip.height() + 1;
        let tip_hash = tip.hash();

        // Gate, checks and credit happen under one scheduler write lock, so a
        // concurrent miss cannot move the turn in between.
        self.scheduler
            .commit_block(&producer, candidate.timestamp(), || {
                let signature_valid = match pre_verified {
                    Some((checked, valid)) if Arc::ptr_eq(&checked, &authority) => valid,
                    _ => {
                        debug!(validator = %short_hex(&producer), "Registry changed, re-verifying signature");
                        candidate.verify(&authority)
                    }
                };
                if !signature_valid {
                    return Err(LedgerError::InvalidSignature {
                        height: candidate.height(),
                    });
                }

                if candidate.height() != expected_height {
                    return Err(LedgerError::InvalidHeight {
                        expected: expected_height,
                        actual: candidate.height(),
                    });
                }

                if *candidate.prev_hash() != tip_hash {
                    return Err(LedgerError::InvalidPrevHash {
                        height: candidate.height(),
                        expected: tip_hash,
                        actual: *candidate.prev_hash(),
                    });
                }
                Ok(())
            })?;

        let block = Arc::new(candidate);
        chain.push(Arc::clone(&block));
        Ok(block)
    }

    /// Charge `expected` with a missed turn, if it still holds the turn.
    ///
    /// Takes the chain lock first, so the charge is ordered against appends.
    pub fn record_missed_turn(&self, expected: &Address) -> LedgerResult<Option<StatusTransition>> {
        let _chain = self.chain.write();
        Ok(self.scheduler.record_missed_turn(expected)?)
    }

    // === AUDIT ===

    /// Re-check every block after genesis against the registry.
    pub fn audit(&self) -> LedgerResult<()> {
        let chain = self.chain.read();
        audit_chain(&chain.blocks, |address| chain.authority_for_audit(address))
    }

    pub fn is_valid(&self) -> bool {
        self.audit().is_ok()
    }

    /// Audit an arbitrary block sequence with this ledger's validators.
    pub fn audit_blocks(&self, blocks: &[Arc<Block>]) -> LedgerResult<()> {
        let chain = self.chain.read();
        audit_chain(blocks, |address| chain.authority_for_audit(address))
    }

    // === QUERIES ===

    pub fn block_by_hash(&self, hash: &Hash) -> Option<Arc<Block>> {
        let chain = self.chain.read();
        let height = *chain.by_hash.get(hash)?;
        chain.blocks.get(height as usize).cloned()
    }

    pub fn block_by_height(&self, height: u64) -> Option<Arc<Block>> {
        let index = usize::try_from(height).ok()?;
        self.chain.read().blocks.get(index).cloned()
    }

    pub fn latest_block(&self) -> Arc<Block> {
        Arc::clone(self.chain.read().tip())
    }

    /// Height of the tip.
    pub fn height(&self) -> u64 {
        self.chain.read().tip().height()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.chain.read().blocks.len()
    }

    /// Always false: the genesis block exists from construction.
    pub fn is_empty(&self) -> bool {
        self.chain.read().blocks.is_empty()
    }

    /// Snapshot of every block in height order.
    pub fn blocks(&self) -> Vec<Arc<Block>> {
        self.chain.read().blocks.clone()
    }

    pub fn current_validator(&self) -> LedgerResult<Arc<Authority>> {
        Ok(self.scheduler.current_validator()?)
    }

    pub fn validator(&self, address: &Address) -> Option<Arc<Authority>> {
        self.chain.read().validators.get(address).cloned()
    }

    /// Registered validators, sorted by address.
    pub fn validators(&self) -> Vec<Arc<Authority>> {
        let mut validators: Vec<_> = self.chain.read().validators.values().cloned().collect();
        validators.sort_by(|a, b| a.address().cmp(b.address()));
        validators
    }

    pub fn retired_validator(&self, address: &Address) -> Option<Arc<Authority>> {
        self.chain.read().retired.get(address).cloned()
    }

    pub fn last_block_time(&self) -> Timestamp {
        self.chain.read().last_block_time
    }

    pub fn scheduler(&self) -> &Arc<RoundRobinScheduler> {
        &self.scheduler
    }

    pub fn time_source(&self) -> &Arc<dyn TimeSource> {
        &self.time_source
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn publish(&self, event: LedgerEvent) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(event);
        }
    }
}
