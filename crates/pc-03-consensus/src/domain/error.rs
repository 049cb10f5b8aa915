//! Error types for Consensus subsystem

use shared_types::Address;

/// Consensus error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    #[error("No validators in rotation")]
    NoValidators,

    #[error("Validator is not active: {0:?}")]
    ValidatorInactive(Address),

    #[error("Not validator's turn: expected {expected:?}, got {actual:?}")]
    NotValidatorTurn { expected: Address, actual: Address },

    #[error("Minimum block interval not reached: waited {elapsed_ms}ms, need {required_ms}ms")]
    BlockIntervalNotElapsed { elapsed_ms: u64, required_ms: u64 },

    #[error("Validator already registered: {0:?}")]
    DuplicateValidator(Address),

    #[error("Unknown validator: {0:?}")]
    UnknownValidator(Address),
}

/// Result type for consensus operations
pub type ConsensusResult<T> = Result<T, ConsensusError>;
