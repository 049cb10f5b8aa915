//! # Core Domain Entities
//!
//! Primitive aliases, the transaction entity, and the status enums shared by
//! the authority, block, consensus, ledger and mempool subsystems.

use crate::encoding::CanonicalEncoder;
use num_traits::Signed;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// Re-export the numeric types so subsystems agree on one definition.
pub use num_bigint::BigInt;
pub use primitive_types::U256;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// A 32-byte validator or account address (SHA-256 of an encoded public key).
pub type Address = [u8; 32];

/// A 64-byte compact ECDSA signature (r ‖ s).
pub type Signature = [u8; 64];

/// Milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// The all-zero hash, used as the genesis parent and for reserved roots.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Hex of the first four bytes, for log fields.
pub fn short_hex(bytes: &[u8]) -> String {
    hex::encode(&bytes[..bytes.len().min(4)])
}

/// Lifecycle of a validator as seen by the scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidatorStatus {
    /// Eligible to produce blocks on its turn.
    #[default]
    Active,
    /// Removed from rotation or administratively disabled.
    Inactive,
    /// Missed too many consecutive turns; registration retained.
    Penalized,
}

/// Execution status of a transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    fn tag(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Success => 1,
            Self::Failed => 2,
        }
    }
}

/// A value transfer or call submitted by an account.
///
/// `value` is an arbitrary-precision signed integer so that malformed
/// negative amounts coming from a decoder can be represented and rejected
/// explicitly instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Digest of the canonical payload (see [`Transaction::compute_hash`]).
    pub hash: Hash,
    /// Sender address.
    pub from: Address,
    /// Recipient address.
    pub to: Address,
    /// Amount transferred.
    pub value: BigInt,
    /// Call data.
    pub data: Vec<u8>,
    /// Price per unit of gas; the mempool orders by this.
    pub gas_price: U256,
    /// Maximum gas the transaction may consume.
    pub gas_limit: u64,
    /// Gas charged once included in a block.
    pub gas_used: u64,
    /// Sender's sequence number.
    pub nonce: u64,
    /// Sender's signature over `hash`.
    pub signature: Vec<u8>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// Builds a pending, unsigned transaction and computes its hash.
    pub fn new(
        from: Address,
        to: Address,
        value: BigInt,
        data: Vec<u8>,
        gas_price: U256,
        gas_limit: u64,
        nonce: u64,
    ) -> Self {
        let mut tx = Self {
            hash: [0u8; 32],
            from,
            to,
            value,
            data,
            gas_price,
            gas_limit,
            gas_used: 0,
            nonce,
            signature: Vec::new(),
            status: TransactionStatus::Pending,
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Attaches a signature produced by the sender.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Hash of the sender-controlled payload.
    ///
    /// Excludes `hash`, `signature`, `gas_used` and `status`, which are either
    /// derived from the payload or assigned after submission.
    pub fn compute_hash(&self) -> Hash {
        let mut enc = CanonicalEncoder::with_capacity(160 + self.data.len());
        enc.put_fixed(&self.from)
            .put_fixed(&self.to)
            .put_bytes(&self.value.to_signed_bytes_be())
            .put_bytes(&self.data)
            .put_u256(&self.gas_price)
            .put_u64(self.gas_limit)
            .put_u64(self.nonce);
        Sha256::digest(enc.finish()).into()
    }

    /// Canonical encoding of every field. Input to the block's Merkle leaves.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity((self.encoded_size() + 32) as usize);
        enc.put_fixed(&self.hash)
            .put_fixed(&self.from)
            .put_fixed(&self.to)
            .put_bytes(&self.value.to_signed_bytes_be())
            .put_bytes(&self.data)
            .put_u256(&self.gas_price)
            .put_u64(self.gas_limit)
            .put_u64(self.gas_used)
            .put_u64(self.nonce)
            .put_bytes(&self.signature)
            .put_u8(self.status.tag());
        enc.finish()
    }

    /// SHA-256 of [`Transaction::canonical_bytes`].
    pub fn digest(&self) -> Hash {
        Sha256::digest(self.canonical_bytes()).into()
    }

    /// Approximate size used for mempool capacity accounting.
    ///
    /// Fixed-width fields count their width, `value` counts as 32 bytes, and
    /// `data`/`signature` count their length. Additive and deterministic.
    pub fn encoded_size(&self) -> u64 {
        let fixed = 32 /* hash */ + 32 /* from */ + 32 /* to */ + 32 /* value */
            + 32 /* gas_price */ + 8 /* gas_limit */ + 8 /* gas_used */ + 8 /* nonce */;
        fixed + self.signature.len() as u64 + self.data.len() as u64
    }

    /// Returns the sender address.
    pub fn sender(&self) -> Address {
        self.from
    }

    /// True if `value` is below zero.
    pub fn has_negative_value(&self) -> bool {
        self.value.is_negative()
    }
}
