//! Sending and receiving capabilities.
//!
//! Token producers take `&impl SendingKey` and consumers take
//! `&impl ReceivingKey`. A single key satisfies the trait directly and
//! ignores the key id; a ring satisfies it by looking the id up.

use vellum_core::{
    AsymmetricPublicKey, AsymmetricSecretKey, Key, KeyKind, Purpose, SymmetricKey, Version,
};

use crate::error::{KeyRingError, Result};

/// A key that can produce tokens.
#[derive(Debug, Clone, Copy)]
pub enum SendingKeyRef<'a> {
    /// Encrypts `local` tokens.
    Symmetric(&'a SymmetricKey),
    /// Signs `public` tokens.
    Secret(&'a AsymmetricSecretKey),
}

impl SendingKeyRef<'_> {
    /// The version the key is bound to.
    pub fn version(&self) -> Version {
        match self {
            SendingKeyRef::Symmetric(k) => k.version(),
            SendingKeyRef::Secret(k) => k.version(),
        }
    }

    /// The purpose of tokens this key produces.
    pub fn purpose(&self) -> Purpose {
        match self {
            SendingKeyRef::Symmetric(_) => Purpose::Local,
            SendingKeyRef::Secret(_) => Purpose::Public,
        }
    }
}

/// A key that can consume tokens.
#[derive(Debug, Clone, Copy)]
pub enum ReceivingKeyRef<'a> {
    /// Decrypts `local` tokens.
    Symmetric(&'a SymmetricKey),
    /// Verifies `public` tokens.
    Public(&'a AsymmetricPublicKey),
}

impl ReceivingKeyRef<'_> {
    /// The version the key is bound to.
    pub fn version(&self) -> Version {
        match self {
            ReceivingKeyRef::Symmetric(k) => k.version(),
            ReceivingKeyRef::Public(k) => k.version(),
        }
    }

    /// The purpose of tokens this key consumes.
    pub fn purpose(&self) -> Purpose {
        match self {
            ReceivingKeyRef::Symmetric(_) => Purpose::Local,
            ReceivingKeyRef::Public(_) => Purpose::Public,
        }
    }
}

/// Resolves to a key that can encrypt or sign.
pub trait SendingKey {
    /// Resolve the key for `key_id`.
    fn sending_key(&self, key_id: Option<&str>) -> Result<SendingKeyRef<'_>>;
}

/// Resolves to a key that can decrypt or verify.
pub trait ReceivingKey {
    /// Resolve the key for `key_id`.
    fn receiving_key(&self, key_id: Option<&str>) -> Result<ReceivingKeyRef<'_>>;
}

impl SendingKey for SymmetricKey {
    fn sending_key(&self, _key_id: Option<&str>) -> Result<SendingKeyRef<'_>> {
        Ok(SendingKeyRef::Symmetric(self))
    }
}

impl SendingKey for AsymmetricSecretKey {
    fn sending_key(&self, _key_id: Option<&str>) -> Result<SendingKeyRef<'_>> {
        Ok(SendingKeyRef::Secret(self))
    }
}

impl ReceivingKey for SymmetricKey {
    fn receiving_key(&self, _key_id: Option<&str>) -> Result<ReceivingKeyRef<'_>> {
        Ok(ReceivingKeyRef::Symmetric(self))
    }
}

impl ReceivingKey for AsymmetricPublicKey {
    fn receiving_key(&self, _key_id: Option<&str>) -> Result<ReceivingKeyRef<'_>> {
        Ok(ReceivingKeyRef::Public(self))
    }
}

impl SendingKey for Key {
    fn sending_key(&self, key_id: Option<&str>) -> Result<SendingKeyRef<'_>> {
        as_sending(key_id.unwrap_or_default(), self)
    }
}

impl ReceivingKey for Key {
    fn receiving_key(&self, key_id: Option<&str>) -> Result<ReceivingKeyRef<'_>> {
        as_receiving(key_id.unwrap_or_default(), self)
    }
}

pub(crate) fn as_sending<'a>(id: &str, key: &'a Key) -> Result<SendingKeyRef<'a>> {
    match key {
        Key::Symmetric(k) => Ok(SendingKeyRef::Symmetric(k)),
        Key::Secret(k) => Ok(SendingKeyRef::Secret(k)),
        Key::Public(_) => Err(KeyRingError::CapabilityViolation {
            id: id.to_string(),
            contract: "sending",
            kind: KeyKind::Public,
        }),
    }
}

pub(crate) fn as_receiving<'a>(id: &str, key: &'a Key) -> Result<ReceivingKeyRef<'a>> {
    match key {
        Key::Symmetric(k) => Ok(ReceivingKeyRef::Symmetric(k)),
        Key::Public(k) => Ok(ReceivingKeyRef::Public(k)),
        Key::Secret(_) => Err(KeyRingError::CapabilityViolation {
            id: id.to_string(),
            contract: "receiving",
            kind: KeyKind::Secret,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key_ignores_key_id() {
        let key = SymmetricKey::from_bytes(&[1u8; 32], Version::V4).unwrap();
        let a = key.sending_key(None).unwrap();
        let b = key.sending_key(Some("anything")).unwrap();
        assert_eq!(a.version(), b.version());
        assert_eq!(a.purpose(), Purpose::Local);
        assert!(matches!(key.receiving_key(Some("x")), Ok(ReceivingKeyRef::Symmetric(_))));
    }

    #[test]
    fn test_tagged_key_capabilities() {
        let sk = AsymmetricSecretKey::from_bytes(&[2u8; 32], Version::V2).unwrap();
        let pk = Key::Public(sk.public_key().unwrap());
        let sk = Key::Secret(sk);

        assert!(matches!(sk.sending_key(None), Ok(SendingKeyRef::Secret(_))));
        assert!(matches!(
            sk.receiving_key(None),
            Err(KeyRingError::CapabilityViolation { kind: KeyKind::Secret, .. })
        ));
        assert!(matches!(pk.receiving_key(None), Ok(ReceivingKeyRef::Public(_))));
        assert!(matches!(
            pk.sending_key(None),
            Err(KeyRingError::CapabilityViolation { kind: KeyKind::Public, .. })
        ));
    }
}
