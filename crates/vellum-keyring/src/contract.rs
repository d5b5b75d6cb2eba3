//! Ring contracts.
//!
//! A contract decides which key kinds a ring may hold. [`Restrictions`]
//! narrow it further to one purpose and a set of versions.

use std::collections::BTreeSet;
use std::fmt;

use vellum_core::{Key, KeyKind, Purpose, Version};

/// Strategy deciding which key kinds a ring admits.
pub trait RingContract: fmt::Debug + Clone + Send + Sync + 'static {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Whether a key of `kind` may be added.
    fn admits(&self, kind: KeyKind) -> bool;
}

/// Keys that produce tokens: symmetric and secret keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sending;

impl RingContract for Sending {
    fn name(&self) -> &'static str {
        "sending"
    }

    fn admits(&self, kind: KeyKind) -> bool {
        matches!(kind, KeyKind::Symmetric | KeyKind::Secret)
    }
}

/// Keys that consume tokens: symmetric and public keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Receiving;

impl RingContract for Receiving {
    fn name(&self) -> &'static str {
        "receiving"
    }

    fn admits(&self, kind: KeyKind) -> bool {
        matches!(kind, KeyKind::Symmetric | KeyKind::Public)
    }
}

/// Optional purpose and version restrictions on a ring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restrictions {
    purpose: Option<Purpose>,
    versions: Option<BTreeSet<Version>>,
}

impl Restrictions {
    /// No restrictions.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only keys serving `purpose`.
    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Only keys bound to one of `versions`.
    pub fn with_versions(mut self, versions: impl IntoIterator<Item = Version>) -> Self {
        self.versions = Some(versions.into_iter().collect());
        self
    }

    /// The purpose restriction, if any.
    pub fn purpose(&self) -> Option<Purpose> {
        self.purpose
    }

    /// The version restriction, if any.
    pub fn versions(&self) -> Option<&BTreeSet<Version>> {
        self.versions.as_ref()
    }

    /// Check a key, returning the reason it is rejected.
    pub fn check(&self, key: &Key) -> Result<(), String> {
        if let Some(purpose) = self.purpose {
            if key.purpose() != purpose {
                return Err(format!(
                    "ring is restricted to {} keys, got a {} key",
                    purpose,
                    key.purpose()
                ));
            }
        }
        if let Some(versions) = &self.versions {
            if !versions.contains(&key.version()) {
                let allowed: Vec<&str> = versions.iter().map(|v| v.tag()).collect();
                return Err(format!(
                    "ring is restricted to versions [{}], got {}",
                    allowed.join(", "),
                    key.version()
                ));
            }
        }
        Ok(())
    }
}
