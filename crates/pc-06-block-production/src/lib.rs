//! # pc-06-block-production
//!
//! The loop that turns pending transactions into blocks.
//!
//! ## Production Attempt
//!
//! [`BlockProducer::produce_once`] looks at the scheduler's turn holder:
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | interval since the last block not elapsed | `Waiting` |
//! | holder not Active | miss charged, `MissRecorded` |
//! | holder not a registered signer, within `validator_timeout_ms` | `NotOurTurn` |
//! | holder not a registered signer, timeout passed | miss charged, `MissRecorded` |
//! | holder is a registered signer | block built, signed, appended: `Produced` |
//!
//! Transactions that fail block insertion are evicted from the mempool.
//! Included transactions are removed once the ledger accepts the block.
//!
//! [`BlockProducer::run`] repeats attempts on a `tokio` interval until a
//! `watch` shutdown signal fires.

mod config;
mod error;
mod producer;

pub use config::ProducerConfig;
pub use error::{ProductionError, ProductionResult};
pub use producer::{BlockProducer, ProducerStats, ProductionOutcome};
