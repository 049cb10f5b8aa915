//! # Canonical Encoding
//!
//! Deterministic byte layout for everything that is hashed or signed.
//!
//! - Integers are fixed-width little-endian.
//! - Fixed-size arrays (hashes, addresses) are written verbatim.
//! - Variable-length byte strings carry a `u32` little-endian length prefix.
//!
//! The same logical value always yields the same bytes, independent of
//! platform, field ordering in memory, or serde configuration.

use primitive_types::U256;

/// Append-only builder for canonical byte strings.
#[derive(Debug, Default, Clone)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    /// Creates an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with a pre-sized buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn put_u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn put_u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Writes a U256 as 32 big-endian bytes.
    pub fn put_u256(&mut self, value: &U256) -> &mut Self {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        self.buf.extend_from_slice(&bytes);
        self
    }

    /// Writes a fixed-size array without a length prefix.
    pub fn put_fixed<const N: usize>(&mut self, bytes: &[u8; N]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Writes a variable-length byte string with a `u32` length prefix.
    ///
    /// Inputs longer than `u32::MAX` are not representable in any entity of
    /// this crate; the length saturates rather than wrapping.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        self.put_u32(len);
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the encoder and returns the bytes.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
