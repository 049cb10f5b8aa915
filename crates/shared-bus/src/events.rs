//! # Ledger Events
//!
//! Every event carries the timestamp (ms) at which it was emitted.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, Timestamp, ValidatorStatus};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A block passed every check and was appended.
    BlockAppended {
        height: u64,
        hash: Hash,
        validator: Address,
        transaction_count: usize,
        timestamp: Timestamp,
    },

    /// A candidate block was rejected; the chain is unchanged.
    BlockRejected {
        height: u64,
        hash: Hash,
        validator: Address,
        reason: String,
        timestamp: Timestamp,
    },

    /// A validator joined the rotation.
    ValidatorAdded {
        address: Address,
        timestamp: Timestamp,
    },

    /// A validator left the rotation.
    ValidatorRemoved {
        address: Address,
        timestamp: Timestamp,
    },

    /// The scheduler changed a validator's status (penalty or reinstatement).
    ValidatorStatusChanged {
        address: Address,
        from: ValidatorStatus,
        to: ValidatorStatus,
        timestamp: Timestamp,
    },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::BlockAppended { .. } | Self::BlockRejected { .. } => EventTopic::Blocks,
            Self::ValidatorAdded { .. }
            | Self::ValidatorRemoved { .. }
            | Self::ValidatorStatusChanged { .. } => EventTopic::Validators,
        }
    }

    /// The validator this event concerns.
    #[must_use]
    pub fn validator(&self) -> &Address {
        match self {
            Self::BlockAppended { validator, .. } | Self::BlockRejected { validator, .. } => {
                validator
            }
            Self::ValidatorAdded { address, .. }
            | Self::ValidatorRemoved { address, .. }
            | Self::ValidatorStatusChanged { address, .. } => address,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::BlockAppended { timestamp, .. }
            | Self::BlockRejected { timestamp, .. }
            | Self::ValidatorAdded { timestamp, .. }
            | Self::ValidatorRemoved { timestamp, .. }
            | Self::ValidatorStatusChanged { timestamp, .. } => *timestamp,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Block append/reject outcomes.
    Blocks,
    /// Validator registration and status changes.
    Validators,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Validators to include. Empty means all validators.
    pub validators: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            validators: Vec::new(),
        }
    }

    /// Create a filter for events concerning specific validators.
    #[must_use]
    pub fn for_validators(validators: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            validators,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let validator_match =
            self.validators.is_empty() || self.validators.contains(event.validator());

        topic_match && validator_match
    }
}
