//! Proptest generators for property-based testing.

use proptest::prelude::*;

use vellum_core::{AsymmetricSecretKey, Purpose, SymmetricKey, Version};

/// Generate a protocol version.
pub fn version() -> impl Strategy<Value = Version> {
    prop_oneof![
        Just(Version::V1),
        Just(Version::V2),
        Just(Version::V3),
        Just(Version::V4),
    ]
}

/// Generate a version without RSA, for properties that run many cases.
pub fn fast_version() -> impl Strategy<Value = Version> {
    prop_oneof![Just(Version::V2), Just(Version::V3), Just(Version::V4)]
}

/// Generate a purpose.
pub fn purpose() -> impl Strategy<Value = Purpose> {
    prop_oneof![Just(Purpose::Local), Just(Purpose::Public)]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a key identifier.
pub fn key_id() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate a symmetric key for `version`.
pub fn symmetric_key(version: Version) -> impl Strategy<Value = SymmetricKey> {
    any::<[u8; 32]>().prop_map(move |bytes| {
        SymmetricKey::from_bytes(&bytes, version).expect("32 bytes is a valid symmetric key")
    })
}

/// Generate an Ed25519 secret key for v2 or v4.
pub fn ed25519_secret_key(version: Version) -> impl Strategy<Value = AsymmetricSecretKey> {
    any::<[u8; 32]>().prop_map(move |seed| {
        AsymmetricSecretKey::from_bytes(&seed, version).expect("any 32-byte seed is valid")
    })
}

/// Inputs for building one token.
#[derive(Debug, Clone)]
pub struct TokenParams {
    pub version: Version,
    pub purpose: Purpose,
    pub payload: Vec<u8>,
    pub footer: Vec<u8>,
    /// Empty for versions without implicit assertion support.
    pub implicit_assertion: Vec<u8>,
    /// Seed for the RNG used while building.
    pub seed: u64,
}

impl Arbitrary for TokenParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            fast_version(),
            purpose(),
            payload(256),
            payload(64), // footer
            payload(32), // implicit assertion
            any::<u64>(),
        )
            .prop_map(|(version, purpose, payload, footer, ia, seed)| TokenParams {
                version,
                purpose,
                payload,
                footer,
                implicit_assertion: if version.supports_implicit_assertions() {
                    ia
                } else {
                    Vec::new()
                },
                seed,
            })
            .boxed()
    }
}
