//! Error types for Vellum Core.

use thiserror::Error;

use crate::version::{Purpose, Version};

/// Core errors that can occur while constructing keys or processing tokens.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid key material for {version}: {reason}")]
    InvalidKeyMaterial { version: Version, reason: String },

    #[error("key is bound to {found}, operation requires {expected}")]
    VersionMismatch { expected: Version, found: Version },

    #[error("wrong purpose: expected {expected}, got {found}")]
    WrongPurpose { expected: Purpose, found: Purpose },

    #[error("token header does not match {expected}")]
    HeaderMismatch { expected: &'static str },

    #[error("implicit assertions are not supported by {0}")]
    ImplicitAssertionUnsupported(Version),

    #[error("token authentication failed")]
    AuthenticationFailed,

    #[error("token footer does not match the expected footer")]
    FooterMismatch,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("unsupported token header: {0}")]
    UnsupportedHeader(String),

    #[error("base64url decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cryptographic error: {0}")]
    Crypto(String),
}

impl CoreError {
    pub(crate) fn invalid_key(version: Version, reason: impl Into<String>) -> Self {
        CoreError::InvalidKeyMaterial {
            version,
            reason: reason.into(),
        }
    }

    /// True if the error means a tag or signature did not verify.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CoreError::AuthenticationFailed | CoreError::FooterMismatch)
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
