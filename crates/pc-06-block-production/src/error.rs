//! Error types for block production

use pc_02_block::BlockError;
use pc_03_consensus::ConsensusError;
use pc_04_ledger::LedgerError;
use shared_types::Address;
use thiserror::Error;

/// Errors that can occur during block production
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductionError {
    /// Registered signer holds no private key
    #[error("Signer cannot sign: {0:?}")]
    SignerWithoutKey(Address),

    /// Block assembly failed
    #[error("Block assembly failed: {0}")]
    Block(#[from] BlockError),

    /// Ledger rejected the produced block
    #[error("Ledger rejected block: {0}")]
    Ledger(#[from] LedgerError),

    /// Scheduler bookkeeping failed
    #[error("Scheduler error: {0}")]
    Consensus(#[from] ConsensusError),
}

/// Result type alias for block production operations
pub type ProductionResult<T> = Result<T, ProductionError>;
