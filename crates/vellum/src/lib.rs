//! # Vellum
//!
//! Versioned authenticated tokens: an authenticated (and for `local` tokens,
//! encrypted) payload plus an authenticated, unencrypted footer, bound to one
//! protocol version and one key.
//!
//! ## Overview
//!
//! - **Local tokens**: symmetric authenticated encryption
//! - **Public tokens**: signatures; the payload is readable by anyone
//! - **Key rings**: several keys addressed by a `"kid"` in the footer
//!
//! ## Key Concepts
//!
//! - **Version**: Fixes every algorithm. A key built for one version is never
//!   accepted by another.
//! - **Footer**: Authenticated but not encrypted. Readable before
//!   verification, so only ever used to pick a key.
//! - **Implicit assertion**: Authenticated context that is not carried in the
//!   token (v3 and v4).
//!
//! ## Usage
//!
//! ```rust
//! use vellum::{AsymmetricSecretKey, KeyRing, TokenBuilder, TokenParser, Version};
//!
//! let current = AsymmetricSecretKey::generate(Version::V4).unwrap();
//! let previous = AsymmetricSecretKey::generate(Version::V4).unwrap();
//!
//! // Verifiers trust both keys during rotation.
//! let ring = KeyRing::receiving()
//!     .with_key("2024-02", current.public_key().unwrap())
//!     .unwrap()
//!     .with_key("2024-01", previous.public_key().unwrap())
//!     .unwrap();
//!
//! let token = TokenBuilder::public(Version::V4)
//!     .payload(br#"{"sub":"alice"}"#.to_vec())
//!     .key_id("2024-02")
//!     .build(&current)
//!     .unwrap();
//!
//! let payload = TokenParser::public().parse(&token, &ring).unwrap();
//! assert_eq!(payload, br#"{"sub":"alice"}"#);
//! ```
//!
//! ## Re-exports
//!
//! - `vellum::core` - Versions, keys, PAE, wire format
//! - `vellum::keyring` - Key rings and capability traits

pub mod builder;
pub mod config;
pub mod error;
pub mod footer;
pub mod parser;

// Re-export component crates
pub use vellum_core as core;
pub use vellum_keyring as keyring;

// Re-export main types for convenience
pub use builder::TokenBuilder;
pub use config::{KeyRingConfig, KeySpec, KeySpecKind, TokenConfig};
pub use error::{Error, Result};
pub use footer::{extract_footer, key_id_from_footer};
pub use parser::TokenParser;

// Re-export commonly used component types
pub use vellum_core::{
    AsymmetricPublicKey, AsymmetricSecretKey, Header, Key, KeyKind, Purpose, SymmetricKey, Token,
    Version,
};
pub use vellum_keyring::{KeyRing, Receiving, ReceivingKey, Sending, SendingKey};
