//! # Shared Crypto
//!
//! Cryptographic primitives used across PoA-Chain subsystems.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256 | Block/transaction hashing, Merkle roots |
//! | `ecdsa` | secp256k1 | Validator identity and block signatures |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization
//! - **Addresses**: SHA-256 of the SEC1 compressed public key

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use hashing::{hash_pair, merkle_root, sha256, sha256_many, Hash};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
