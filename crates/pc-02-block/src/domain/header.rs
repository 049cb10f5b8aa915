//! Block header and its canonical encoding

use serde::{Deserialize, Serialize};
use shared_crypto::sha256;
use shared_types::{Address, CanonicalEncoder, Hash, Timestamp, ZERO_HASH};

/// Current header format version.
pub const BLOCK_VERSION: u32 = 1;

/// Encoded header length: u32 + 4 × u64 + 5 × 32-byte fields.
pub(crate) const HEADER_ENCODED_LEN: usize = 4 + 8 * 4 + 32 * 5;

/// Block header containing all metadata
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    pub version: u32,
    pub timestamp: Timestamp,
    pub prev_hash: Hash,
    pub height: u64,
    /// Opaque; supplied by the producer.
    pub state_root: Hash,
    pub transaction_root: Hash,
    /// Reserved, always zero.
    pub receipt_root: Hash,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub validator_address: Address,
}

impl BlockHeader {
    /// Deterministic byte encoding, fields in declaration order.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::with_capacity(HEADER_ENCODED_LEN);
        enc.put_u32(self.version)
            .put_u64(self.timestamp)
            .put_fixed(&self.prev_hash)
            .put_u64(self.height)
            .put_fixed(&self.state_root)
            .put_fixed(&self.transaction_root)
            .put_fixed(&self.receipt_root)
            .put_u64(self.gas_limit)
            .put_u64(self.gas_used)
            .put_fixed(&self.validator_address);
        enc.finish()
    }

    /// SHA-256 of the canonical encoding. This is what the producer signs.
    pub fn digest(&self) -> Hash {
        sha256(&self.canonical_bytes())
    }

    /// Check if this is a genesis header
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.prev_hash == ZERO_HASH
    }

    /// True for a header nobody filled in.
    pub fn is_empty(&self) -> bool {
        self.version == 0
    }
}
