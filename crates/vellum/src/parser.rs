//! Token verification and decryption.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use vellum_core::{CoreError, Purpose, Token, Version};
use vellum_keyring::{ReceivingKey, ReceivingKeyRef};

use crate::error::{Error, Result};
use crate::footer::key_id_from_footer;

/// Parses tokens of one purpose.
///
/// Checks run cheapest first and all precede any cryptography: structure,
/// version allow list, purpose, footer length, key resolution, expected
/// footer. Only then is the token decrypted or verified.
#[derive(Debug, Clone)]
pub struct TokenParser {
    purpose: Purpose,
    allowed_versions: BTreeSet<Version>,
    expected_footer: Option<Vec<u8>>,
    implicit_assertion: Vec<u8>,
    max_footer_len: Option<usize>,
}

impl TokenParser {
    /// A parser for `purpose`, accepting every version.
    pub fn new(purpose: Purpose) -> Self {
        Self {
            purpose,
            allowed_versions: Version::ALL.into_iter().collect(),
            expected_footer: None,
            implicit_assertion: Vec::new(),
            max_footer_len: None,
        }
    }

    /// A parser for encrypted (`local`) tokens.
    pub fn local() -> Self {
        Self::new(Purpose::Local)
    }

    /// A parser for signed (`public`) tokens.
    pub fn public() -> Self {
        Self::new(Purpose::Public)
    }

    /// Accept only these versions.
    pub fn allow_versions(mut self, versions: impl IntoIterator<Item = Version>) -> Self {
        self.allowed_versions = versions.into_iter().collect();
        self
    }

    /// Require the footer to equal `footer` exactly.
    pub fn expect_footer(mut self, footer: impl Into<Vec<u8>>) -> Self {
        self.expected_footer = Some(footer.into());
        self
    }

    /// The implicit assertion the token must have been built with.
    pub fn implicit_assertion(mut self, assertion: impl Into<Vec<u8>>) -> Self {
        self.implicit_assertion = assertion.into();
        self
    }

    /// Reject tokens whose footer is longer than `max` bytes.
    pub fn max_footer_len(mut self, max: usize) -> Self {
        self.max_footer_len = Some(max);
        self
    }

    /// The purpose this parser accepts.
    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Parse, authenticate and return the payload.
    pub fn parse(&self, token: &str, key: &impl ReceivingKey) -> Result<Vec<u8>> {
        let token: Token = token.parse()?;
        self.parse_token(&token, key)
    }

    /// Authenticate an already parsed token and return the payload.
    pub fn parse_token(&self, token: &Token, key: &impl ReceivingKey) -> Result<Vec<u8>> {
        let header = token.header();
        let version = header.version();

        if !self.allowed_versions.contains(&version) {
            return Err(Error::VersionNotAllowed(version));
        }
        if header.purpose() != self.purpose {
            return Err(CoreError::WrongPurpose {
                expected: self.purpose,
                found: header.purpose(),
            }
            .into());
        }
        if let Some(max) = self.max_footer_len {
            let len = token.footer().len();
            if len > max {
                return Err(Error::FooterTooLong { len, max });
            }
        }

        let key_id = key_id_from_footer(token.footer());
        let resolved = key.receiving_key(key_id.as_deref())?;
        if resolved.purpose() != self.purpose {
            return Err(CoreError::WrongPurpose {
                expected: self.purpose,
                found: resolved.purpose(),
            }
            .into());
        }

        let expected = self.expected_footer.as_deref();
        let ia = &self.implicit_assertion;
        let result = match resolved {
            ReceivingKeyRef::Symmetric(k) => version.decrypt(k, token, expected, ia),
            ReceivingKeyRef::Public(k) => version.verify(k, token, expected, ia),
        };

        match result {
            Ok(payload) => {
                debug!(
                    version = %version,
                    purpose = %self.purpose,
                    footer_len = token.footer().len(),
                    key_id = key_id.as_deref(),
                    "token parsed"
                );
                Ok(payload)
            }
            Err(e) => {
                if e.is_authentication_failure() {
                    warn!(
                        version = %version,
                        key_id = key_id.as_deref(),
                        "token authentication failed"
                    );
                }
                Err(e.into())
            }
        }
    }
}
