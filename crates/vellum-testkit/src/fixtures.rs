//! Test fixtures and helpers.
//!
//! Common key setup for integration tests. All keys are derived from fixed
//! seeds so test failures reproduce.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::SeedableRng;
use vellum_core::{AsymmetricPublicKey, AsymmetricSecretKey, SymmetricKey, Version};
use vellum_keyring::{KeyRing, Receiving, Sending};

/// Seed used by [`KeyFixture::new`].
pub const DEFAULT_SEED: u64 = 0x7665_6c6c_756d;

/// A full key set for one version.
#[derive(Debug, Clone)]
pub struct KeyFixture {
    pub version: Version,
    pub local: SymmetricKey,
    pub secret: AsymmetricSecretKey,
    pub public: AsymmetricPublicKey,
}

impl KeyFixture {
    /// Deterministic keys for `version`.
    ///
    /// The v1 RSA key is generated once per process and shared.
    pub fn new(version: Version) -> Self {
        let secret = match version {
            Version::V1 => rsa_secret_key().clone(),
            _ => secret_key_from_seed(version, DEFAULT_SEED),
        };
        Self::from_parts(version, DEFAULT_SEED, secret)
    }

    /// Keys for `version` derived from `seed`.
    ///
    /// Generating a fresh v1 key takes noticeably long; prefer [`Self::new`]
    /// for v1 unless distinct RSA keys are needed.
    pub fn with_seed(version: Version, seed: u64) -> Self {
        let secret = secret_key_from_seed(version, seed);
        Self::from_parts(version, seed, secret)
    }

    fn from_parts(version: Version, seed: u64, secret: AsymmetricSecretKey) -> Self {
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
        let local = SymmetricKey::generate_with_rng(version, &mut rng);
        let public = secret
            .public_key()
            .expect("fixture secret key has a public key");
        Self {
            version,
            local,
            secret,
            public,
        }
    }
}

/// One fixture per version, oldest first.
pub fn all_versions() -> Vec<KeyFixture> {
    Version::ALL.into_iter().map(KeyFixture::new).collect()
}

/// Matching sending and receiving rings for a rotation scenario.
///
/// Each id gets its own local key and signing key pair. The sending ring
/// holds local and secret keys under `"<id>.local"` / `"<id>.public"`; the
/// receiving ring holds the local and public keys under the same ids.
pub fn rotation_rings(version: Version, ids: &[&str]) -> (KeyRing<Sending>, KeyRing<Receiving>) {
    let mut sending = KeyRing::sending();
    let mut receiving = KeyRing::receiving();
    for (i, id) in ids.iter().enumerate() {
        let fixture = if version == Version::V1 && i == 0 {
            KeyFixture::new(version)
        } else {
            KeyFixture::with_seed(version, DEFAULT_SEED + i as u64 + 1)
        };
        let local_id = format!("{}.local", id);
        let public_id = format!("{}.public", id);
        sending
            .add_key(local_id.clone(), fixture.local.clone())
            .and_then(|r| r.add_key(public_id.clone(), fixture.secret))
            .expect("fixture keys fit a sending ring");
        receiving
            .add_key(local_id, fixture.local)
            .and_then(|r| r.add_key(public_id, fixture.public))
            .expect("fixture keys fit a receiving ring");
    }
    (sending, receiving)
}

fn secret_key_from_seed(version: Version, seed: u64) -> AsymmetricSecretKey {
    let mut rng = StdRng::seed_from_u64(seed);
    AsymmetricSecretKey::generate_with_rng(version, &mut rng).expect("key generation")
}

fn rsa_secret_key() -> &'static AsymmetricSecretKey {
    static KEY: OnceLock<AsymmetricSecretKey> = OnceLock::new();
    KEY.get_or_init(|| secret_key_from_seed(Version::V1, DEFAULT_SEED))
}
