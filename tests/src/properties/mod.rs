//! # Property Tests
//!
//! | Module | Property |
//! |--------|----------|
//! | `chain` | built chains audit clean; a flipped `prev_hash` bit fails the audit |
//! | `chain` | signatures verify only for the signed message |
//! | `chain` | adding a transaction changes the block hash |
//! | `mempool` | selection is price-ordered and within budget |
//! | `mempool` | a repeated (sender, nonce) is rejected |

pub mod chain;
pub mod mempool;
