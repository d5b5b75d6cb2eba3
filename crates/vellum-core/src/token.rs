//! The token wire format.
//!
//! ```text
//! header || base64url(payload) [ || "." || base64url(footer) ]
//! ```
//!
//! The header is `"<version>.<purpose>."`. A token has exactly three
//! dot-separated segments without a footer or four with one. An empty
//! fourth segment is rejected: a token without a footer has no trailing dot.

use bytes::Bytes;
use std::fmt;
use std::str::FromStr;

use crate::encoding;
use crate::error::{CoreError, Result};
use crate::version::Header;

/// A parsed but unverified token.
///
/// Parsing only checks structure. Nothing in a `Token` is trusted until it
/// has been decrypted or verified with a key.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    header: Header,
    payload: Bytes,
    footer: Bytes,
}

impl Token {
    /// Assemble a token from its parts.
    pub fn new(header: Header, payload: impl Into<Bytes>, footer: impl Into<Bytes>) -> Self {
        Self {
            header,
            payload: payload.into(),
            footer: footer.into(),
        }
    }

    /// The header.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Raw payload bytes (nonce, ciphertext, tag or message, signature).
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Raw footer bytes; empty when the token carries none.
    pub fn footer(&self) -> &[u8] {
        &self.footer
    }

    /// Whether a footer segment is present.
    pub fn has_footer(&self) -> bool {
        !self.footer.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header.as_str())?;
        f.write_str(&encoding::encode(&self.payload))?;
        if !self.footer.is_empty() {
            f.write_str(".")?;
            f.write_str(&encoding::encode(&self.footer))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, payload={} bytes, footer={} bytes)",
            self.header,
            self.payload.len(),
            self.footer.len()
        )
    }
}

impl FromStr for Token {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(CoreError::MalformedToken(format!(
                "expected 3 or 4 segments, got {}",
                parts.len()
            )));
        }

        // The header includes its trailing dot, which lands right after
        // the version and purpose segments.
        let header_len = parts[0].len() + parts[1].len() + 2;
        let header = Header::lookup(&s[..header_len])
            .ok_or_else(|| CoreError::UnsupportedHeader(s[..header_len].to_string()))?;

        if parts[2].is_empty() {
            return Err(CoreError::MalformedToken("empty payload".into()));
        }
        let payload = encoding::decode(parts[2])?;

        let footer = match parts.get(3) {
            None => Vec::new(),
            Some(segment) if segment.is_empty() => {
                return Err(CoreError::MalformedToken("empty footer segment".into()))
            }
            Some(segment) => encoding::decode(segment)?,
        };

        Ok(Self::new(header, payload, footer))
    }
}

/// Read the footer of a token without verifying anything.
///
/// Intended for key lookup (e.g. a key id in the footer) before the token
/// is verified. The result is untrusted.
pub fn extract_footer(token: &str) -> Result<Vec<u8>> {
    let token: Token = token.parse()?;
    Ok(token.footer.to_vec())
}
