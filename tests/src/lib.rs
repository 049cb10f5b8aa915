//! # PoA-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/   # Cross-crate scenarios and producer flows
//! ├── properties/    # proptest properties over chains and the mempool
//! └── fixtures.rs    # Shared builders
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::
//! cargo test -p pc-tests properties::
//!
//! # Benchmarks
//! cargo bench -p pc-tests
//! ```

pub mod fixtures;
pub mod integration;
pub mod properties;
