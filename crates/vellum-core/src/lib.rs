//! # Vellum Core
//!
//! Pure primitives for versioned authenticated tokens: pre-authentication
//! encoding, protocol versions, key objects and the token wire format.
//!
//! This crate contains no I/O and no logging. It is pure computation over
//! keys and bytes; randomness enters only through the `_with_rng` entry
//! points (or the OS RNG in their plain counterparts).
//!
//! ## Key Types
//!
//! - [`Version`] - Closed set of protocol versions, each a fixed construction
//! - [`Header`] - Version plus [`Purpose`], resolved from a static table
//! - [`SymmetricKey`], [`AsymmetricSecretKey`], [`AsymmetricPublicKey`] - Keys bound to one version
//! - [`Token`] - Parsed, unverified wire token
//!
//! ## Operations
//!
//! Constructions are dispatched on the version value:
//!
//! ```
//! use vellum_core::{SymmetricKey, Version};
//!
//! let key = SymmetricKey::generate(Version::V4);
//! let token = Version::V4.encrypt(&key, b"hello world", b"", b"").unwrap();
//! let message = Version::V4.decrypt(&key, &token, None, b"").unwrap();
//! assert_eq!(message, b"hello world");
//! ```

pub mod encoding;
pub mod error;
pub mod keys;
pub mod pae;
mod protocol;
pub mod token;
pub mod version;

pub use error::{CoreError, Result};
pub use keys::{AsymmetricPublicKey, AsymmetricSecretKey, Key, KeyKind, SymmetricKey};
pub use pae::pae;
pub use token::{extract_footer, Token};
pub use version::{Header, Purpose, Version};
