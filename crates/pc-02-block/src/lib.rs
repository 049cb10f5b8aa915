//! # pc-02-block
//!
//! Blocks for PoA-Chain.
//!
//! A [`Block`] is a [`BlockHeader`], an ordered list of transactions and the
//! producer's signature over the header digest. The header commits to the
//! transactions through a binary Merkle root over per-transaction digests.
//!
//! ## Hashing
//!
//! ```text
//! header_digest = SHA256(canonical header bytes)
//! signature     = sign(producer, header_digest)
//! block_hash    = SHA256(header_digest || signature)
//! ```
//!
//! The block hash is memoized and recomputed only after the transaction set
//! or the signature changes.
//!
//! ## Lifecycle
//!
//! `Block::new` signs the empty block. Adding transactions changes the header,
//! so the producer signs again before handing the block to the ledger.

pub mod domain;

pub use domain::{
    compute_transaction_root, Block, BlockError, BlockHeader, BlockResult, BLOCK_VERSION,
};
