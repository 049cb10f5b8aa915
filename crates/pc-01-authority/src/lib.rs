//! # pc-01-authority
//!
//! Validator identity for PoA-Chain.
//!
//! An [`Authority`] owns a secp256k1 keypair, derives its 32-byte address as
//! `SHA-256(compressed public key)`, signs block digests, and carries the
//! health counters the round-robin scheduler uses to decide penalties.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pc_01_authority::Authority;
//!
//! let authority = Authority::new(None)?;
//! let signature = authority.sign(&digest)?;
//! assert!(authority.verify(&digest, &signature));
//! ```
//!
//! ## Concurrency
//!
//! Identity (address, keys) is immutable after construction. Health counters
//! sit behind a `parking_lot::RwLock`, so an `Arc<Authority>` can be shared by
//! the ledger, the scheduler and block producers.

pub mod domain;

pub use domain::{Authority, AuthorityError, AuthorityMetrics, AuthorityResult};
