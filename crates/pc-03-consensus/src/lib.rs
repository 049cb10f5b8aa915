//! # pc-03-consensus
//!
//! Round-robin Proof-of-Authority scheduling for PoA-Chain.
//!
//! ## Rotation
//!
//! Validators take turns in registration order. The turn pointer advances
//! exactly once per accepted block ([`RoundRobinScheduler::record_block_production`])
//! or per missed turn ([`RoundRobinScheduler::record_missed_block`]).
//!
//! ```text
//!   current_turn
//!        │
//!        ▼
//!   [ V1 ][ V2 ][ V3 ]   ── produce or miss ──▶   [ V1 ][ V2 ][ V3 ]
//!                                                         ▲
//! ```
//!
//! ## Block Gate
//!
//! [`RoundRobinScheduler::validate_block`] answers "may this validator append
//! a block stamped at this time, right now", checking in order:
//!
//! 1. the block interval has elapsed since the last block,
//! 2. it is the validator's turn,
//! 3. the validator is Active.
//!
//! ## Health
//!
//! A validator whose consecutive misses reach `max_consecutive_misses` is
//! moved to `Penalized`. It keeps its slot in the rotation but every turn it
//! holds is skipped until it is reinstated.

pub mod domain;
pub mod scheduler;

pub use domain::{ConsensusConfig, ConsensusError, ConsensusResult, StatusTransition};
pub use scheduler::RoundRobinScheduler;
