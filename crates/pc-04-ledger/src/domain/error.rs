//! Error types for the Ledger subsystem

use pc_02_block::BlockError;
use pc_03_consensus::ConsensusError;
use shared_types::{Address, Hash};

/// Ledger error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Unknown validator: {0:?}")]
    UnknownValidator(Address),

    #[error("Invalid signature on block at height {height}")]
    InvalidSignature { height: u64 },

    #[error("Invalid block height: expected {expected}, got {actual}")]
    InvalidHeight { expected: u64, actual: u64 },

    #[error("Invalid previous hash at height {height}: expected {expected:?}, got {actual:?}")]
    InvalidPrevHash {
        height: u64,
        expected: Hash,
        actual: Hash,
    },

    #[error("Consensus rejected block: {0}")]
    Consensus(#[from] ConsensusError),

    #[error("Block error: {0}")]
    Block(#[from] BlockError),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
