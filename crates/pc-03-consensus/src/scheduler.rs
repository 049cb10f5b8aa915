//! Round-robin scheduler
//!
//! One `RwLock` guards the rotation. Event publishing happens after the lock
//! is released.

use crate::domain::{ConsensusConfig, ConsensusError, ConsensusResult, StatusTransition};
use parking_lot::RwLock;
use pc_01_authority::Authority;
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{short_hex, Address, SystemTimeSource, TimeSource, Timestamp, ValidatorStatus};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RotationState {
    validators: Vec<Arc<Authority>>,
    current_turn: usize,
    last_block_time: Timestamp,
}

impl RotationState {
    fn position(&self, address: &Address) -> Option<usize> {
        self.validators.iter().position(|v| v.address() == address)
    }

    fn turn_holder(&self) -> Option<&Arc<Authority>> {
        self.validators.get(self.current_turn)
    }

    fn advance(&mut self) {
        if !self.validators.is_empty() {
            self.current_turn = (self.current_turn + 1) % self.validators.len();
        }
    }
}

/// Round-robin Proof-of-Authority scheduler.
pub struct RoundRobinScheduler {
    state: RwLock<RotationState>,
    config: ConsensusConfig,
    time_source: Arc<dyn TimeSource>,
    publisher: RwLock<Option<Arc<dyn EventPublisher>>>,
}

impl std::fmt::Debug for RoundRobinScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("RoundRobinScheduler")
            .field("validators", &state.validators.len())
            .field("current_turn", &state.current_turn)
            .field("last_block_time", &state.last_block_time)
            .field("config", &self.config)
            .finish()
    }
}

impl RoundRobinScheduler {
    /// Create an empty rotation using the system clock.
    pub fn new(config: ConsensusConfig) -> Self {
        Self::with_time_source(config, Arc::new(SystemTimeSource))
    }

    /// Create an empty rotation with a custom clock (for testing).
    pub fn with_time_source(config: ConsensusConfig, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            state: RwLock::new(RotationState::default()),
            config,
            time_source,
            publisher: RwLock::new(None),
        }
    }

    /// Attach an event publisher for status transitions.
    pub fn with_event_publisher(self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.set_event_publisher(publisher);
        self
    }

    pub fn set_event_publisher(&self, publisher: Arc<dyn EventPublisher>) {
        *self.publisher.write() = Some(publisher);
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    // === ROTATION MEMBERSHIP ===

    /// Append a validator to the rotation and mark it Active.
    pub fn add_validator(&self, authority: Arc<Authority>) -> ConsensusResult<()> {
        let mut state = self.state.write();
        if state.position(authority.address()).is_some() {
            return Err(ConsensusError::DuplicateValidator(*authority.address()));
        }

        authority.set_status(ValidatorStatus::Active, self.time_source.now());
        info!(
            validator = %short_hex(authority.address()),
            position = state.validators.len(),
            "Validator added to rotation"
        );
        state.validators.push(authority);
        Ok(())
    }

    /// Remove a validator from the rotation and mark it Inactive.
    ///
    /// Keeps the turn on the same validator when an earlier entry is removed,
    /// and wraps to the start when the last entry held the turn.
    pub fn remove_validator(&self, address: &Address) -> Option<Arc<Authority>> {
        let mut state = self.state.write();
        let index = state.position(address)?;

        let removed = state.validators.remove(index);
        removed.set_status(ValidatorStatus::Inactive, self.time_source.now());

        if index < state.current_turn {
            state.current_turn -= 1;
        }
        if state.current_turn >= state.validators.len() {
            state.current_turn = 0;
        }

        info!(
            validator = %short_hex(address),
            remaining = state.validators.len(),
            "Validator removed from rotation"
        );
        Some(removed)
    }

    /// Return a Penalized or Inactive validator to Active.
    ///
    /// Returns `None` if it was already Active.
    pub fn reinstate_validator(&self, address: &Address) -> ConsensusResult<Option<StatusTransition>> {
        let transition = {
            let state = self.state.read();
            let index = state
                .position(address)
                .ok_or(ConsensusError::UnknownValidator(*address))?;
            let authority = &state.validators[index];
            if authority.is_active() {
                return Ok(None);
            }

            let from = authority.set_status(ValidatorStatus::Active, self.time_source.now());
            StatusTransition {
                address: *address,
                from,
                to: ValidatorStatus::Active,
            }
        };

        info!(validator = %short_hex(address), from = ?transition.from, "Validator reinstated");
        self.publish_transition(&transition);
        Ok(Some(transition))
    }

    // === TURN QUERIES ===

    /// The Active validator whose turn it is.
    pub fn current_validator(&self) -> ConsensusResult<Arc<Authority>> {
        let state = self.state.read();
        let holder = state.turn_holder().ok_or(ConsensusError::NoValidators)?;
        if !holder.is_active() {
            return Err(ConsensusError::ValidatorInactive(*holder.address()));
        }
        Ok(Arc::clone(holder))
    }

    /// The validator at the turn pointer, whatever its status.
    pub fn turn_holder(&self) -> Option<Arc<Authority>> {
        self.state.read().turn_holder().cloned()
    }

    /// True iff `address` holds the turn and is Active.
    pub fn is_turn(&self, address: &Address) -> bool {
        self.state
            .read()
            .turn_holder()
            .is_some_and(|holder| holder.address() == address && holder.is_active())
    }

    /// Gate for appending a block by `address` stamped `block_timestamp`.
    ///
    /// Elapsed time is measured from the last accepted block's timestamp to
    /// `block_timestamp`.
    pub fn validate_block(&self, address: &Address, block_timestamp: Timestamp) -> ConsensusResult<()> {
        let state = self.state.read();
        self.check_block(&state, address, block_timestamp)?;
        debug!(validator = %short_hex(address), block_timestamp, "Block passed scheduler gate");
        Ok(())
    }

    fn check_block(
        &self,
        state: &RotationState,
        address: &Address,
        block_timestamp: Timestamp,
    ) -> ConsensusResult<()> {
        let elapsed_ms = block_timestamp.saturating_sub(state.last_block_time);
        if elapsed_ms < self.config.block_interval_ms {
            return Err(ConsensusError::BlockIntervalNotElapsed {
                elapsed_ms,
                required_ms: self.config.block_interval_ms,
            });
        }

        let holder = state.turn_holder().ok_or(ConsensusError::NoValidators)?;
        if holder.address() != address {
            return Err(ConsensusError::NotValidatorTurn {
                expected: *holder.address(),
                actual: *address,
            });
        }

        if !holder.is_active() {
            return Err(ConsensusError::ValidatorInactive(*address));
        }
        Ok(())
    }

    // === TURN ACCOUNTING ===

    /// Gate, verify and credit a block by `address` in one critical section.
    ///
    /// `verify` runs after the scheduler gate passes and before the producer
    /// is credited; if it fails nothing is recorded. The turn cannot move
    /// between the gate and the credit, so the validator credited is always
    /// `address`. `verify` must not call back into the scheduler.
    pub fn commit_block<E, F>(
        &self,
        address: &Address,
        block_timestamp: Timestamp,
        verify: F,
    ) -> Result<(), E>
    where
        E: From<ConsensusError>,
        F: FnOnce() -> Result<(), E>,
    {
        let mut state = self.state.write();
        self.check_block(&state, address, block_timestamp)?;
        verify()?;

        let producer = state
            .turn_holder()
            .cloned()
            .ok_or(ConsensusError::NoValidators)?;
        producer.record_block_production(block_timestamp);
        state.last_block_time = block_timestamp;
        state.advance();

        debug!(
            producer = %short_hex(address),
            next_turn = state.current_turn,
            "Block committed"
        );
        Ok(())
    }

    /// Credit the turn holder with a block and pass the turn on.
    ///
    /// Unchecked; appends go through [`Self::commit_block`].
    pub fn record_block_production(&self, timestamp: Timestamp) {
        let mut state = self.state.write();
        let Some(producer) = state.turn_holder().cloned() else {
            warn!("No validators in rotation, skipping block production record");
            return;
        };

        producer.record_block_production(timestamp);
        state.last_block_time = timestamp;
        state.advance();

        debug!(
            producer = %short_hex(producer.address()),
            next_turn = state.current_turn,
            "Block production recorded"
        );
    }

    /// Charge the turn holder with a miss and pass the turn on.
    ///
    /// An Active validator reaching `max_consecutive_misses` becomes
    /// Penalized; the transition is returned and published.
    pub fn record_missed_block(&self) -> ConsensusResult<Option<StatusTransition>> {
        self.charge_miss(None)
    }

    /// Like [`Self::record_missed_block`], but only if `expected` still holds
    /// the turn. Otherwise nothing is charged and `NotValidatorTurn` names
    /// the actual holder.
    pub fn record_missed_turn(&self, expected: &Address) -> ConsensusResult<Option<StatusTransition>> {
        self.charge_miss(Some(expected))
    }

    fn charge_miss(&self, expected: Option<&Address>) -> ConsensusResult<Option<StatusTransition>> {
        let transition = {
            let mut state = self.state.write();
            let holder = state
                .turn_holder()
                .cloned()
                .ok_or(ConsensusError::NoValidators)?;

            if let Some(expected) = expected {
                if holder.address() != expected {
                    return Err(ConsensusError::NotValidatorTurn {
                        expected: *holder.address(),
                        actual: *expected,
                    });
                }
            }

            let misses = holder.record_missed_block();
            state.advance();

            warn!(
                validator = %short_hex(holder.address()),
                consecutive_misses = misses,
                "Missed block recorded"
            );

            if holder.is_active() && misses >= self.config.max_consecutive_misses {
                let from = holder.set_status(ValidatorStatus::Penalized, self.time_source.now());
                Some(StatusTransition {
                    address: *holder.address(),
                    from,
                    to: ValidatorStatus::Penalized,
                })
            } else {
                None
            }
        };

        if let Some(transition) = &transition {
            warn!(validator = %short_hex(&transition.address), "Validator penalized");
            self.publish_transition(transition);
        }
        Ok(transition)
    }

    // === COUNTS & ACCESSORS ===

    pub fn validator_count(&self) -> usize {
        self.state.read().validators.len()
    }

    pub fn active_validator_count(&self) -> usize {
        self.state
            .read()
            .validators
            .iter()
            .filter(|v| v.is_active())
            .count()
    }

    /// Whether enough validators are Active to keep producing.
    pub fn has_quorum(&self) -> bool {
        self.active_validator_count() >= self.config.min_active_validators
    }

    /// Snapshot of the rotation in turn order.
    pub fn validators(&self) -> Vec<Arc<Authority>> {
        self.state.read().validators.clone()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.state.read().position(address).is_some()
    }

    pub fn block_interval(&self) -> u64 {
        self.config.block_interval_ms
    }

    pub fn last_block_time(&self) -> Timestamp {
        self.state.read().last_block_time
    }

    pub fn current_turn(&self) -> usize {
        self.state.read().current_turn
    }

    fn publish_transition(&self, transition: &StatusTransition) {
        if let Some(publisher) = self.publisher.read().as_ref() {
            publisher.publish(LedgerEvent::ValidatorStatusChanged {
                address: transition.address,
                from: transition.from,
                to: transition.to,
                timestamp: self.time_source.now(),
            });
        }
    }
}
