//! Configuration for token handling and key rings.
//!
//! Both structs deserialize from JSON. Missing fields take their defaults.
//!
//! ```json
//! {
//!   "default_version": "v4",
//!   "allowed_versions": ["v3", "v4"],
//!   "max_footer_len": 1024
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use vellum_core::{Key, KeyKind, Purpose, Version};
use vellum_keyring::{KeyRing, Receiving, RingContract, Sending};

use crate::builder::TokenBuilder;
use crate::error::{Error, Result};
use crate::parser::TokenParser;

/// Default maximum footer length accepted by parsers built from config.
pub const DEFAULT_MAX_FOOTER_LEN: usize = 8 * 1024;

/// Token handling defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Version used by builders.
    pub default_version: Version,
    /// Versions accepted by parsers.
    pub allowed_versions: Vec<Version>,
    /// Maximum footer length accepted by parsers; `None` disables the check.
    pub max_footer_len: Option<usize>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_version: Version::default(),
            allowed_versions: Version::ALL.to_vec(),
            max_footer_len: Some(DEFAULT_MAX_FOOTER_LEN),
        }
    }
}

impl TokenConfig {
    /// Parse and validate JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate JSON configuration from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_versions.is_empty() {
            return Err(Error::Config("allowed_versions must not be empty".into()));
        }
        if !self.allowed_versions.contains(&self.default_version) {
            return Err(Error::Config(format!(
                "default_version {} is not in allowed_versions",
                self.default_version
            )));
        }
        Ok(())
    }

    /// A builder for `purpose` at the default version.
    pub fn builder(&self, purpose: Purpose) -> TokenBuilder {
        TokenBuilder::new(self.default_version, purpose)
    }

    /// A parser for `purpose` with the configured allow list and limits.
    pub fn parser(&self, purpose: Purpose) -> TokenParser {
        let parser = TokenParser::new(purpose).allow_versions(self.allowed_versions.iter().copied());
        match self.max_footer_len {
            Some(max) => parser.max_footer_len(max),
            None => parser,
        }
    }
}

/// Kind of key in a [`KeySpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySpecKind {
    /// Symmetric key for `local` tokens.
    Local,
    /// Secret key for signing `public` tokens.
    Secret,
    /// Public key for verifying `public` tokens.
    Public,
}

impl From<KeySpecKind> for KeyKind {
    fn from(kind: KeySpecKind) -> Self {
        match kind {
            KeySpecKind::Local => KeyKind::Symmetric,
            KeySpecKind::Secret => KeyKind::Secret,
            KeySpecKind::Public => KeyKind::Public,
        }
    }
}

/// One configured key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    /// Identifier written to and read from the `"kid"` footer member.
    pub id: String,
    /// Version the key is bound to.
    pub version: Version,
    /// Key kind.
    pub kind: KeySpecKind,
    /// Unpadded base64url key material.
    pub key: String,
}

impl KeySpec {
    /// Decode the key material.
    pub fn decode(&self) -> Result<Key> {
        Ok(Key::decode(&self.key, self.kind.into(), self.version)?)
    }
}

impl std::fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySpec")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A set of keys to load into a ring.
///
/// ```json
/// {
///   "keys": [
///     { "id": "2024-06", "version": "v4", "kind": "local", "key": "..." }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyRingConfig {
    /// Keys, in ring insertion order.
    pub keys: Vec<KeySpec>,
}

impl KeyRingConfig {
    /// Parse JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load JSON configuration from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Build a ring of symmetric and public keys.
    pub fn receiving_ring(&self) -> Result<KeyRing<Receiving>> {
        self.build_ring(KeyRing::receiving())
    }

    /// Build a ring of symmetric and secret keys.
    pub fn sending_ring(&self) -> Result<KeyRing<Sending>> {
        self.build_ring(KeyRing::sending())
    }

    fn build_ring<C: RingContract>(&self, mut ring: KeyRing<C>) -> Result<KeyRing<C>> {
        for spec in &self.keys {
            ring.add_key(spec.id.clone(), spec.decode()?)?;
        }
        Ok(ring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::{AsymmetricSecretKey, SymmetricKey};
    use vellum_keyring::KeyRingError;

    #[test]
    fn test_defaults() {
        let config = TokenConfig::default();
        assert_eq!(config.default_version, Version::V4);
        assert_eq!(config.allowed_versions.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = TokenConfig::from_json_str(r#"{"allowed_versions": ["v4"]}"#).unwrap();
        assert_eq!(config.default_version, Version::V4);
        assert_eq!(config.allowed_versions, vec![Version::V4]);
        assert_eq!(config.max_footer_len, Some(DEFAULT_MAX_FOOTER_LEN));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            TokenConfig::from_json_str(r#"{"allowed_versions": []}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TokenConfig::from_json_str(r#"{"default_version": "v2", "allowed_versions": ["v4"]}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            TokenConfig::from_json_str(r#"{"default_version": "v9"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_key_ring_config() {
        let local = SymmetricKey::generate(Version::V4);
        let sk = AsymmetricSecretKey::generate(Version::V4).unwrap();
        let pk = sk.public_key().unwrap();

        let json = format!(
            r#"{{"keys": [
                {{"id": "local", "version": "v4", "kind": "local", "key": "{}"}},
                {{"id": "signer", "version": "v4", "kind": "public", "key": "{}"}}
            ]}}"#,
            local.encode(),
            pk.encode()
        );
        let config = KeyRingConfig::from_json_str(&json).unwrap();
        let ring = config.receiving_ring().unwrap();
        assert_eq!(ring.ids().collect::<Vec<_>>(), vec!["local", "signer"]);
        assert_eq!(ring.get_key("local").unwrap(), &Key::from(local));

        // Public keys cannot go into a sending ring.
        assert!(matches!(
            config.sending_ring(),
            Err(Error::KeyRing(KeyRingError::CapabilityViolation { .. }))
        ));
    }

    #[test]
    fn test_key_spec_debug_hides_material() {
        let spec = KeySpec {
            id: "k".into(),
            version: Version::V4,
            kind: KeySpecKind::Local,
            key: "c2VjcmV0".into(),
        };
        assert!(!format!("{:?}", spec).contains("c2VjcmV0"));
    }
}
