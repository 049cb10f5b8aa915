//! # Integration Tests
//!
//! - `scenarios`: the reference acceptance scenarios, one test each
//! - `flows`: producer, ledger, mempool and event bus wired together

pub mod flows;
pub mod scenarios;
