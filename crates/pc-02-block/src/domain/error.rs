//! Error types for the Block subsystem

use pc_01_authority::AuthorityError;
use shared_types::{Address, Hash};

/// Block error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Transaction gas limit {requested} exceeds remaining block gas {remaining}")]
    GasLimitExceeded { requested: u64, remaining: u64 },

    #[error("Duplicate nonce {nonce} for sender {from:?}")]
    DuplicateNonce { from: Address, nonce: u64 },

    #[error("Transaction {0:?} has a negative value")]
    NegativeValue(Hash),

    #[error("Block header is empty")]
    EmptyHeader,

    #[error("Transaction root mismatch: header {header:?}, computed {computed:?}")]
    TransactionRootMismatch { header: Hash, computed: Hash },

    #[error("Gas used mismatch: header {header}, computed {computed}")]
    GasUsedMismatch { header: u64, computed: u64 },

    #[error("Signing failed: {0}")]
    Signing(#[from] AuthorityError),
}

/// Result type for block operations
pub type BlockResult<T> = Result<T, BlockError>;
