//! # Vellum Key Rings
//!
//! Multi-key containers for token production and consumption.
//!
//! ## Overview
//!
//! A [`KeyRing`] maps key identifiers to keys. Tokens name their key in the
//! footer (`{"kid": "..."}`), and the ring resolves that identifier when the
//! token is built or parsed. This supports key rotation (several keys valid at
//! once) and multi-recipient setups.
//!
//! ## Capabilities
//!
//! Rings are parameterised by a [`RingContract`]:
//!
//! - [`Sending`]: symmetric and secret keys (encrypt / sign)
//! - [`Receiving`]: symmetric and public keys (decrypt / verify)
//!
//! The [`SendingKey`] and [`ReceivingKey`] traits are implemented both by
//! single keys and by rings with the matching contract, so callers accept
//! either.
//!
//! ## Usage
//!
//! ```rust
//! use vellum_core::{SymmetricKey, Version};
//! use vellum_keyring::{KeyRing, ReceivingKey};
//!
//! let ring = KeyRing::receiving()
//!     .with_key("2024-01", SymmetricKey::generate(Version::V4))
//!     .unwrap()
//!     .with_key("2024-02", SymmetricKey::generate(Version::V4))
//!     .unwrap();
//!
//! assert!(ring.receiving_key(Some("2024-02")).is_ok());
//! assert!(ring.receiving_key(None).is_err());
//! ```

pub mod capability;
pub mod contract;
pub mod error;
pub mod ring;

pub use capability::{ReceivingKey, ReceivingKeyRef, SendingKey, SendingKeyRef};
pub use contract::{Receiving, Restrictions, RingContract, Sending};
pub use error::{KeyRingError, Result};
pub use ring::KeyRing;
