//! # Vellum Testkit
//!
//! Testing utilities for Vellum tokens.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: PAE, Ed25519 and per-construction token vectors
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic per-version key sets and key rings
//!
//! ## Golden Vectors
//!
//! ```rust
//! use vellum_testkit::vectors::verify_pae_vectors;
//!
//! for (name, matches, actual) in verify_pae_vectors() {
//!     assert!(matches, "{}: {}", name, actual);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust
//! use proptest::prelude::*;
//! use proptest::test_runner::TestRunner;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use vellum_core::Purpose;
//! use vellum_testkit::fixtures::KeyFixture;
//! use vellum_testkit::generators::TokenParams;
//!
//! let mut runner = TestRunner::default();
//! runner
//!     .run(&any::<TokenParams>(), |p| {
//!         let keys = KeyFixture::new(p.version);
//!         let mut rng = StdRng::seed_from_u64(p.seed);
//!         let ia = p.implicit_assertion.as_slice();
//!         let message = match p.purpose {
//!             Purpose::Local => {
//!                 let token = p
//!                     .version
//!                     .encrypt_with_rng(&keys.local, &p.payload, &p.footer, ia, &mut rng)
//!                     .unwrap();
//!                 p.version.decrypt(&keys.local, &token, Some(&p.footer), ia).unwrap()
//!             }
//!             Purpose::Public => {
//!                 let token = p
//!                     .version
//!                     .sign_with_rng(&keys.secret, &p.payload, &p.footer, ia, &mut rng)
//!                     .unwrap();
//!                 p.version.verify(&keys.public, &token, Some(&p.footer), ia).unwrap()
//!             }
//!         };
//!         prop_assert_eq!(message, p.payload);
//!         Ok(())
//!     })
//!     .unwrap();
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use vellum_core::Version;
//! use vellum_testkit::fixtures::KeyFixture;
//!
//! let fixture = KeyFixture::new(Version::V4);
//! let token = Version::V4.encrypt(&fixture.local, b"data", b"", b"").unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{all_versions, rotation_rings, KeyFixture};
pub use generators::TokenParams;
pub use vectors::{
    failure_vectors, local_vectors, pae_vectors, public_vectors, verify_ed25519_vectors,
    verify_failure_vectors, verify_local_vectors, verify_pae_vectors, verify_public_vectors,
    FailureVector, FixedRng, LocalVector, PaeVector, PublicVector, VectorKey,
};
