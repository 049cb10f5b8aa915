//! Validator identity and health tracking

use super::{AuthorityError, AuthorityResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared_crypto::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
use shared_types::{short_hex, Address, Signature, Timestamp, ValidatorStatus};
use tracing::debug;

/// Mutable health state of a validator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Health {
    status: ValidatorStatus,
    last_active: Timestamp,
    produced_blocks: u64,
    missed_blocks: u64,
    consecutive_misses: u64,
}

/// Point-in-time snapshot of an authority's health counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityMetrics {
    pub address: Address,
    pub status: ValidatorStatus,
    pub last_active: Timestamp,
    pub produced_blocks: u64,
    pub missed_blocks: u64,
    pub consecutive_misses: u64,
}

impl AuthorityMetrics {
    /// Share of assigned turns that produced a block, in `[0.0, 1.0]`.
    ///
    /// A validator with no turns yet reports `1.0`.
    pub fn uptime(&self) -> f64 {
        let total = self.produced_blocks + self.missed_blocks;
        if total == 0 {
            return 1.0;
        }
        self.produced_blocks as f64 / total as f64
    }
}

/// A validator identity: keypair, derived address and health counters.
///
/// The private key never leaves this struct. An authority built with
/// [`Authority::from_public_key`] can verify but not sign.
pub struct Authority {
    address: Address,
    public_key: Secp256k1PublicKey,
    keypair: Option<Secp256k1KeyPair>,
    health: RwLock<Health>,
}

impl std::fmt::Debug for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authority")
            .field("address", &short_hex(&self.address))
            .field("can_sign", &self.keypair.is_some())
            .field("health", &*self.health.read())
            .finish()
    }
}

impl Authority {
    /// Create an authority from 32 bytes of secret key material, or a fresh
    /// random keypair when `None`.
    pub fn new(key_material: Option<[u8; 32]>) -> AuthorityResult<Self> {
        let keypair = match key_material {
            Some(bytes) => Secp256k1KeyPair::from_bytes(bytes)
                .map_err(|e| AuthorityError::KeyGenerationFailed(e.to_string()))?,
            None => Secp256k1KeyPair::generate(),
        };
        Ok(Self::from_keypair(keypair))
    }

    /// Create an authority with a fresh random keypair.
    pub fn generate() -> Self {
        Self::from_keypair(Secp256k1KeyPair::generate())
    }

    /// Create a verify-only authority from a compressed public key.
    pub fn from_public_key(bytes: [u8; 33]) -> AuthorityResult<Self> {
        let public_key =
            Secp256k1PublicKey::from_bytes(bytes).map_err(|_| AuthorityError::InvalidPublicKey)?;
        Ok(Self::assemble(public_key, None))
    }

    fn from_keypair(keypair: Secp256k1KeyPair) -> Self {
        let public_key = keypair.public_key();
        Self::assemble(public_key, Some(keypair))
    }

    fn assemble(public_key: Secp256k1PublicKey, keypair: Option<Secp256k1KeyPair>) -> Self {
        let address = public_key.to_address();
        debug!(address = %short_hex(&address), "Authority created");
        Self {
            address,
            public_key,
            keypair,
            health: RwLock::new(Health::default()),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &Secp256k1PublicKey {
        &self.public_key
    }

    /// Whether this authority holds a private key.
    pub fn can_sign(&self) -> bool {
        self.keypair.is_some()
    }

    /// Sign a digest with the private key.
    pub fn sign(&self, digest: &[u8]) -> AuthorityResult<Signature> {
        let keypair = self
            .keypair
            .as_ref()
            .ok_or_else(|| AuthorityError::SigningFailed("no private key".to_string()))?;
        let signature = keypair
            .sign(digest)
            .map_err(|e| AuthorityError::SigningFailed(e.to_string()))?;
        Ok(*signature.as_bytes())
    }

    /// Verify a signature over `digest` against this authority's public key.
    pub fn verify(&self, digest: &[u8], signature: &Signature) -> bool {
        self.public_key
            .verify(digest, &Secp256k1Signature::from_bytes(*signature))
            .is_ok()
    }

    /// Credit a produced block: resets the miss streak.
    pub fn record_block_production(&self, at: Timestamp) {
        let mut health = self.health.write();
        health.produced_blocks += 1;
        health.consecutive_misses = 0;
        health.last_active = at;
    }

    /// Charge a missed turn. Returns the new consecutive miss count.
    pub fn record_missed_block(&self) -> u64 {
        let mut health = self.health.write();
        health.missed_blocks += 1;
        health.consecutive_misses += 1;
        health.consecutive_misses
    }

    pub fn status(&self) -> ValidatorStatus {
        self.health.read().status
    }

    pub fn is_active(&self) -> bool {
        self.status() == ValidatorStatus::Active
    }

    /// Set the status. Returns the previous one.
    ///
    /// Becoming `Active` refreshes `last_active` and clears the miss streak.
    pub fn set_status(&self, status: ValidatorStatus, at: Timestamp) -> ValidatorStatus {
        let mut health = self.health.write();
        let previous = health.status;
        health.status = status;
        if status == ValidatorStatus::Active {
            health.last_active = at;
            health.consecutive_misses = 0;
        }
        previous
    }

    pub fn last_active(&self) -> Timestamp {
        self.health.read().last_active
    }

    pub fn consecutive_misses(&self) -> u64 {
        self.health.read().consecutive_misses
    }

    /// Snapshot of the health counters.
    pub fn metrics(&self) -> AuthorityMetrics {
        let health = *self.health.read();
        AuthorityMetrics {
            address: self.address,
            status: health.status,
            last_active: health.last_active,
            produced_blocks: health.produced_blocks,
            missed_blocks: health.missed_blocks,
            consecutive_misses: health.consecutive_misses,
        }
    }
}
