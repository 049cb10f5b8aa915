//! Error types for the Authority subsystem

/// Authority error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorityError {
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Signing failed: {0}")]
    SigningFailed(String),
}

/// Result type for authority operations
pub type AuthorityResult<T> = Result<T, AuthorityError>;
