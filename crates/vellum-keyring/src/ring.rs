//! The key ring container.
//!
//! A ring maps key identifiers to keys. Rings are populated during setup and
//! then shared: every lookup takes `&self`.

use std::collections::HashMap;

use tracing::debug;
use vellum_core::{Key, Purpose, Version};

use crate::capability::{
    as_receiving, as_sending, ReceivingKey, ReceivingKeyRef, SendingKey, SendingKeyRef,
};
use crate::contract::{Receiving, Restrictions, RingContract, Sending};
use crate::error::{KeyRingError, Result};

/// An ordered set of keys addressable by identifier.
///
/// Iteration follows insertion order. Re-adding an identifier replaces the
/// key in place, keeping its position.
#[derive(Debug, Clone)]
pub struct KeyRing<C: RingContract> {
    contract: C,
    restrictions: Restrictions,
    entries: Vec<(String, Key)>,
    index: HashMap<String, usize>,
}

impl KeyRing<Sending> {
    /// An empty ring of symmetric and secret keys.
    pub fn sending() -> Self {
        Self::new(Sending)
    }
}

impl KeyRing<Receiving> {
    /// An empty ring of symmetric and public keys.
    pub fn receiving() -> Self {
        Self::new(Receiving)
    }
}

impl<C: RingContract> KeyRing<C> {
    /// An empty ring governed by `contract`.
    pub fn new(contract: C) -> Self {
        Self {
            contract,
            restrictions: Restrictions::none(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The ring's contract.
    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// The ring's current restrictions.
    pub fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    /// Add a key, replacing any key with the same identifier.
    pub fn add_key(&mut self, id: impl Into<String>, key: impl Into<Key>) -> Result<&mut Self> {
        let id = id.into();
        let key = key.into();
        self.admit(&id, &key)?;

        debug!(
            key_id = %id,
            version = %key.version(),
            kind = %key.kind(),
            contract = self.contract.name(),
            overwritten = self.index.contains_key(&id),
            "key added to ring"
        );

        match self.index.get(&id) {
            Some(&pos) => self.entries[pos].1 = key,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, key));
            }
        }
        Ok(self)
    }

    /// Chained form of [`add_key`](Self::add_key).
    pub fn with_key(mut self, id: impl Into<String>, key: impl Into<Key>) -> Result<Self> {
        self.add_key(id, key)?;
        Ok(self)
    }

    /// Look up a key by identifier.
    pub fn get_key(&self, id: &str) -> Result<&Key> {
        self.index
            .get(id)
            .map(|&pos| &self.entries[pos].1)
            .ok_or_else(|| KeyRingError::KeyNotFound(id.to_string()))
    }

    /// Whether a key with this identifier exists.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ring holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// `(id, key)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Key)> {
        self.entries.iter().map(|(id, key)| (id.as_str(), key))
    }

    /// Restrict the ring to keys of one purpose.
    ///
    /// Fails without changing the ring if a current key violates it.
    pub fn restrict_purpose(&mut self, purpose: Purpose) -> Result<&mut Self> {
        let narrowed = self.restrictions.clone().with_purpose(purpose);
        self.narrow(narrowed)
    }

    /// Restrict the ring to keys bound to one of `versions`.
    ///
    /// Fails without changing the ring if a current key violates it.
    pub fn restrict_versions(
        &mut self,
        versions: impl IntoIterator<Item = Version>,
    ) -> Result<&mut Self> {
        let narrowed = self.restrictions.clone().with_versions(versions);
        self.narrow(narrowed)
    }

    fn narrow(&mut self, restrictions: Restrictions) -> Result<&mut Self> {
        for (id, key) in &self.entries {
            restrictions
                .check(key)
                .map_err(|reason| KeyRingError::RestrictionViolation {
                    id: id.clone(),
                    reason,
                })?;
        }
        self.restrictions = restrictions;
        Ok(self)
    }

    fn admit(&self, id: &str, key: &Key) -> Result<()> {
        if !self.contract.admits(key.kind()) {
            return Err(KeyRingError::CapabilityViolation {
                id: id.to_string(),
                contract: self.contract.name(),
                kind: key.kind(),
            });
        }
        self.restrictions
            .check(key)
            .map_err(|reason| KeyRingError::RestrictionViolation {
                id: id.to_string(),
                reason,
            })
    }

    fn lookup(&self, key_id: Option<&str>) -> Result<&Key> {
        self.get_key(key_id.ok_or(KeyRingError::MissingKeyId)?)
    }
}

impl SendingKey for KeyRing<Sending> {
    fn sending_key(&self, key_id: Option<&str>) -> Result<SendingKeyRef<'_>> {
        let key = self.lookup(key_id)?;
        as_sending(key_id.unwrap_or_default(), key)
    }
}

impl ReceivingKey for KeyRing<Receiving> {
    fn receiving_key(&self, key_id: Option<&str>) -> Result<ReceivingKeyRef<'_>> {
        let key = self.lookup(key_id)?;
        as_receiving(key_id.unwrap_or_default(), key)
    }
}
