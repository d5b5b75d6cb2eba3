//! Error types for key rings.

use thiserror::Error;
use vellum_core::{CoreError, KeyKind};

/// Errors that can occur while populating or querying a key ring.
#[derive(Debug, Error)]
pub enum KeyRingError {
    /// The key's kind is not allowed by the ring's contract.
    #[error("key {id:?}: a {kind} key cannot be held by a {contract} ring")]
    CapabilityViolation {
        id: String,
        contract: &'static str,
        kind: KeyKind,
    },

    /// The key violates a purpose or version restriction.
    #[error("key {id:?}: {reason}")]
    RestrictionViolation { id: String, reason: String },

    /// No key with this identifier.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A ring was asked for a key without an identifier.
    #[error("key ring lookup requires a key id")]
    MissingKeyId,

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for key ring operations.
pub type Result<T> = std::result::Result<T, KeyRingError>;
