//! Error types for the token facade.

use thiserror::Error;
use vellum_core::{CoreError, Version};
use vellum_keyring::KeyRingError;

/// Errors that can occur while building or parsing tokens.
#[derive(Debug, Error)]
pub enum Error {
    /// Key, protocol or wire-format error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Key lookup or ring population error.
    #[error("key ring error: {0}")]
    KeyRing(#[from] KeyRingError),

    /// The token's version is not in the parser's allow list.
    #[error("version {0} is not allowed")]
    VersionNotAllowed(Version),

    /// Footer exceeds the configured maximum.
    #[error("footer is {len} bytes, maximum is {max}")]
    FooterTooLong { len: usize, max: usize },

    /// Footer could not be read or written as JSON.
    #[error("footer error: {0}")]
    Footer(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True if a tag, signature or expected footer did not match.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_authentication_failure())
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
