//! Mempool error types.

use shared_types::{Address, Hash};

/// Mempool error type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MempoolError {
    /// Transaction already exists in the pool.
    DuplicateTransaction(Hash),

    /// The sender already has a pending transaction with this nonce.
    DuplicateNonce { sender: Address, nonce: u64 },

    /// Admitting the transaction would exceed the byte capacity.
    CapacityExceeded {
        size: u64,
        current: u64,
        capacity: u64,
    },
}

impl std::fmt::Display for MempoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateTransaction(hash) => {
                write!(f, "Duplicate transaction: {:?}", &hash[..4])
            }
            Self::DuplicateNonce { sender, nonce } => {
                write!(
                    f,
                    "Sender {:?} already has pending nonce {}",
                    &sender[..4],
                    nonce
                )
            }
            Self::CapacityExceeded {
                size,
                current,
                capacity,
            } => {
                write!(
                    f,
                    "Pool capacity exceeded: {} + {} bytes > {} bytes",
                    current, size, capacity
                )
            }
        }
    }
}

impl std::error::Error for MempoolError {}

/// Result type for mempool operations
pub type MempoolResult<T> = Result<T, MempoolError>;
