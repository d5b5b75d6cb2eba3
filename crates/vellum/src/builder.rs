//! Token construction.

use rand::{CryptoRng, RngCore};
use serde_json::Value;
use tracing::debug;
use vellum_core::{CoreError, Purpose, Version};
use vellum_keyring::{SendingKey, SendingKeyRef};

use crate::error::{Error, Result};
use crate::footer::with_key_id;

#[derive(Debug, Clone)]
enum FooterContent {
    Raw(Vec<u8>),
    Json(Value),
}

/// Builds a token for one version and purpose.
///
/// ```
/// use vellum::{SymmetricKey, TokenBuilder, TokenParser, Version};
///
/// let key = SymmetricKey::generate(Version::V4);
/// let token = TokenBuilder::local(Version::V4)
///     .payload(b"hello world".to_vec())
///     .build(&key)
///     .unwrap();
/// assert!(token.starts_with("v4.local."));
///
/// let message = TokenParser::local().parse(&token, &key).unwrap();
/// assert_eq!(message, b"hello world");
/// ```
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    version: Version,
    purpose: Purpose,
    payload: Vec<u8>,
    footer: FooterContent,
    key_id: Option<String>,
    implicit_assertion: Vec<u8>,
}

impl TokenBuilder {
    /// A builder for `version` and `purpose`.
    pub fn new(version: Version, purpose: Purpose) -> Self {
        Self {
            version,
            purpose,
            payload: Vec::new(),
            footer: FooterContent::Raw(Vec::new()),
            key_id: None,
            implicit_assertion: Vec::new(),
        }
    }

    /// A builder for encrypted (`local`) tokens.
    pub fn local(version: Version) -> Self {
        Self::new(version, Purpose::Local)
    }

    /// A builder for signed (`public`) tokens.
    pub fn public(version: Version) -> Self {
        Self::new(version, Purpose::Public)
    }

    /// Set the payload.
    pub fn payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Set a raw footer.
    pub fn footer(mut self, footer: impl Into<Vec<u8>>) -> Self {
        self.footer = FooterContent::Raw(footer.into());
        self
    }

    /// Set a JSON footer.
    pub fn footer_json(mut self, footer: &Value) -> Self {
        self.footer = FooterContent::Json(footer.clone());
        self
    }

    /// Name the signing or encryption key.
    ///
    /// The id is written into the footer as `"kid"` and used to resolve the
    /// key when building from a ring.
    pub fn key_id(mut self, id: impl Into<String>) -> Self {
        self.key_id = Some(id.into());
        self
    }

    /// Bind an implicit assertion (v3 and v4 only).
    pub fn implicit_assertion(mut self, assertion: impl Into<Vec<u8>>) -> Self {
        self.implicit_assertion = assertion.into();
        self
    }

    /// Build the token using the OS random number generator.
    pub fn build(&self, key: &impl SendingKey) -> Result<String> {
        self.build_with_rng(key, &mut rand::rngs::OsRng)
    }

    /// Build the token.
    pub fn build_with_rng<R: RngCore + CryptoRng>(
        &self,
        key: &impl SendingKey,
        rng: &mut R,
    ) -> Result<String> {
        let resolved = key.sending_key(self.key_id.as_deref())?;
        if resolved.purpose() != self.purpose {
            return Err(CoreError::WrongPurpose {
                expected: self.purpose,
                found: resolved.purpose(),
            }
            .into());
        }

        let footer = self.footer_bytes()?;
        let ia = &self.implicit_assertion;
        let token = match resolved {
            SendingKeyRef::Symmetric(k) => {
                self.version.encrypt_with_rng(k, &self.payload, &footer, ia, rng)?
            }
            SendingKeyRef::Secret(k) => {
                self.version.sign_with_rng(k, &self.payload, &footer, ia, rng)?
            }
        };

        debug!(
            version = %self.version,
            purpose = %self.purpose,
            footer_len = footer.len(),
            key_id = self.key_id.as_deref(),
            "token built"
        );
        Ok(token.to_string())
    }

    fn footer_bytes(&self) -> Result<Vec<u8>> {
        let base = match &self.footer {
            FooterContent::Raw(bytes) => bytes.clone(),
            FooterContent::Json(value) => {
                serde_json::to_vec(value).map_err(|e| Error::Footer(e.to_string()))?
            }
        };
        match &self.key_id {
            Some(id) => with_key_id(&base, id),
            None => Ok(base),
        }
    }
}
