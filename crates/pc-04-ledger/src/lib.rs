//! # pc-04-ledger
//!
//! The append-only block chain of PoA-Chain.
//!
//! ## Append Protocol
//!
//! [`Ledger::append_block`] accepts a candidate only if, in order:
//!
//! 1. its producer is a registered validator,
//! 2. the scheduler admits the producer at the block's timestamp,
//! 3. the signature verifies under the registered key,
//! 4. its height is the tip height + 1,
//! 5. its `prev_hash` is the tip hash.
//!
//! The first failing check is returned; the chain is left untouched.
//!
//! ## Locking
//!
//! Chain state sits behind one `RwLock`. Operations that touch both the
//! chain and the scheduler take the ledger lock first. Signature
//! verification runs before the write lock is taken; under the lock the
//! result is reused only if the registered authority is the same instance.

pub mod domain;
pub mod ledger;

pub use domain::{audit_chain, LedgerConfig, LedgerError, LedgerResult};
pub use ledger::Ledger;
