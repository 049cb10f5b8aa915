//! # pc-05-mempool
//!
//! Pending transactions awaiting inclusion, selected by gas price.
//!
//! ## Admission
//!
//! [`Mempool::add`] rejects, in order:
//!
//! | Error | Condition |
//! |-------|-----------|
//! | `DuplicateTransaction` | hash already pooled |
//! | `DuplicateNonce` | sender already has this nonce pooled |
//! | `CapacityExceeded` | summed `encoded_size` would pass `capacity_bytes` |
//!
//! A rejected transaction leaves the pool untouched.
//!
//! ## Selection
//!
//! [`Mempool::select_for_block`] walks a copy of the price heap, highest gas
//! price first (smaller hash first on ties), and packs every transaction
//! whose `gas_limit` still fits the budget. Selection never removes anything;
//! the producer calls [`Mempool::remove_included`] after the block lands.

pub mod domain;
pub mod mempool;

pub use domain::{
    MempoolConfig, MempoolError, MempoolResult, MempoolStatus, PricedTransaction, TransactionPool,
};
pub use mempool::Mempool;
