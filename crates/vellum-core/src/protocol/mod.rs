//! Per-version token constructions.
//!
//! Each version module implements the raw constructions over payload bytes.
//! This module owns everything that is shared: key/version binding, header
//! and footer checks, and assembling a [`Token`].
//!
//! Order of checks on every entry point, all before any cryptographic work:
//! 1. The key is bound to this version
//! 2. The token header is this version's header for the purpose (constant time)
//! 3. Implicit assertions are only given to versions that support them
//! 4. The footer matches the expected footer, if one is given (constant time)

mod v1;
mod v2;
mod v3;
mod v4;

use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::error::{CoreError, Result};
use crate::keys::{
    AsymmetricPublicKey, AsymmetricSecretKey, SigningMaterial, SymmetricKey, VerifyingMaterial,
};
use crate::token::Token;
use crate::version::{Purpose, Version};

impl Version {
    /// Encrypt `message` into a `local` token.
    pub fn encrypt(
        self,
        key: &SymmetricKey,
        message: &[u8],
        footer: &[u8],
        implicit_assertion: &[u8],
    ) -> Result<Token> {
        self.encrypt_with_rng(key, message, footer, implicit_assertion, &mut rand::rngs::OsRng)
    }

    /// Encrypt `message` into a `local` token, drawing the nonce from `rng`.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        self,
        key: &SymmetricKey,
        message: &[u8],
        footer: &[u8],
        implicit_assertion: &[u8],
        rng: &mut R,
    ) -> Result<Token> {
        self.check_key(key.version())?;
        self.check_implicit_assertion(implicit_assertion)?;

        let k = key.as_bytes();
        let payload = match self {
            Version::V1 => v1::encrypt(k, message, footer, rng)?,
            Version::V2 => v2::encrypt(k, message, footer, rng)?,
            Version::V3 => v3::encrypt(k, message, footer, implicit_assertion, rng)?,
            Version::V4 => v4::encrypt(k, message, footer, implicit_assertion, rng)?,
        };
        Ok(Token::new(self.header(Purpose::Local), payload, footer.to_vec()))
    }

    /// Authenticate and decrypt a `local` token.
    ///
    /// The tag is checked before anything is decrypted.
    pub fn decrypt(
        self,
        key: &SymmetricKey,
        token: &Token,
        expected_footer: Option<&[u8]>,
        implicit_assertion: &[u8],
    ) -> Result<Vec<u8>> {
        self.check_key(key.version())?;
        self.check_header(Purpose::Local, token)?;
        self.check_implicit_assertion(implicit_assertion)?;
        check_footer(token, expected_footer)?;

        let k = key.as_bytes();
        let payload = token.payload();
        let footer = token.footer();
        match self {
            Version::V1 => v1::decrypt(k, payload, footer),
            Version::V2 => v2::decrypt(k, payload, footer),
            Version::V3 => v3::decrypt(k, payload, footer, implicit_assertion),
            Version::V4 => v4::decrypt(k, payload, footer, implicit_assertion),
        }
    }

    /// Sign `message` into a `public` token.
    pub fn sign(
        self,
        key: &AsymmetricSecretKey,
        message: &[u8],
        footer: &[u8],
        implicit_assertion: &[u8],
    ) -> Result<Token> {
        self.sign_with_rng(key, message, footer, implicit_assertion, &mut rand::rngs::OsRng)
    }

    /// Sign `message` into a `public` token.
    ///
    /// `rng` feeds the randomized schemes (RSA-PSS salt, hedged ECDSA);
    /// Ed25519 versions do not consume it.
    pub fn sign_with_rng<R: RngCore + CryptoRng>(
        self,
        key: &AsymmetricSecretKey,
        message: &[u8],
        footer: &[u8],
        implicit_assertion: &[u8],
        rng: &mut R,
    ) -> Result<Token> {
        self.check_key(key.version())?;
        self.check_implicit_assertion(implicit_assertion)?;

        let payload = match (self, key.material()) {
            (Version::V1, SigningMaterial::Rsa(sk)) => v1::sign(sk, message, footer, rng)?,
            (Version::V2, SigningMaterial::Ed25519(sk)) => v2::sign(sk, message, footer),
            (Version::V3, SigningMaterial::P384(sk)) => {
                v3::sign(sk, message, footer, implicit_assertion, rng)?
            }
            (Version::V4, SigningMaterial::Ed25519(sk)) => {
                v4::sign(sk, message, footer, implicit_assertion)
            }
            _ => return Err(CoreError::invalid_key(self, "key material does not match version")),
        };
        Ok(Token::new(self.header(Purpose::Public), payload, footer.to_vec()))
    }

    /// Verify a `public` token and return its message.
    pub fn verify(
        self,
        key: &AsymmetricPublicKey,
        token: &Token,
        expected_footer: Option<&[u8]>,
        implicit_assertion: &[u8],
    ) -> Result<Vec<u8>> {
        self.check_key(key.version())?;
        self.check_header(Purpose::Public, token)?;
        self.check_implicit_assertion(implicit_assertion)?;
        check_footer(token, expected_footer)?;

        let payload = token.payload();
        let footer = token.footer();
        match (self, key.material()) {
            (Version::V1, VerifyingMaterial::Rsa(pk)) => v1::verify(pk, payload, footer),
            (Version::V2, VerifyingMaterial::Ed25519(pk)) => v2::verify(pk, payload, footer),
            (Version::V3, VerifyingMaterial::P384(pk)) => {
                v3::verify(pk, key.as_bytes(), payload, footer, implicit_assertion)
            }
            (Version::V4, VerifyingMaterial::Ed25519(pk)) => {
                v4::verify(pk, payload, footer, implicit_assertion)
            }
            _ => Err(CoreError::invalid_key(self, "key material does not match version")),
        }
    }

    fn check_key(self, key_version: Version) -> Result<()> {
        if key_version != self {
            return Err(CoreError::VersionMismatch {
                expected: self,
                found: key_version,
            });
        }
        Ok(())
    }

    fn check_header(self, purpose: Purpose, token: &Token) -> Result<()> {
        let expected = self.header(purpose);
        if !bool::from(token.header().as_bytes().ct_eq(expected.as_bytes())) {
            return Err(CoreError::HeaderMismatch {
                expected: expected.as_str(),
            });
        }
        Ok(())
    }

    fn check_implicit_assertion(self, implicit_assertion: &[u8]) -> Result<()> {
        if !implicit_assertion.is_empty() && !self.supports_implicit_assertions() {
            return Err(CoreError::ImplicitAssertionUnsupported(self));
        }
        Ok(())
    }
}

fn check_footer(token: &Token, expected: Option<&[u8]>) -> Result<()> {
    match expected {
        Some(expected) if !bool::from(token.footer().ct_eq(expected)) => {
            Err(CoreError::FooterMismatch)
        }
        _ => Ok(()),
    }
}

/// Split `payload` into `(head, tail)` where `tail` is the last `n` bytes.
fn split_tail(payload: &[u8], n: usize) -> Result<(&[u8], &[u8])> {
    if payload.len() < n {
        return Err(CoreError::MalformedToken(format!(
            "payload is {} bytes, need at least {}",
            payload.len(),
            n
        )));
    }
    Ok(payload.split_at(payload.len() - n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn local_key(version: Version) -> SymmetricKey {
        SymmetricKey::from_bytes(&[0x70; 32], version).unwrap()
    }

    fn secret_key(version: Version, seed: u64) -> AsymmetricSecretKey {
        let mut rng = StdRng::seed_from_u64(seed);
        AsymmetricSecretKey::generate_with_rng(version, &mut rng).unwrap()
    }

    #[test]
    fn test_local_roundtrip_all_versions() {
        for version in Version::ALL {
            let key = local_key(version);
            let token = version.encrypt(&key, b"hello world", b"footer", b"").unwrap();
            assert!(token.to_string().starts_with(version.header(Purpose::Local).as_str()));
            let message = version.decrypt(&key, &token, Some(b"footer"), b"").unwrap();
            assert_eq!(message, b"hello world");
        }
    }

    #[test]
    fn test_public_roundtrip_all_versions() {
        for version in Version::ALL {
            let sk = secret_key(version, 42);
            let pk = sk.public_key().unwrap();
            let token = version.sign(&sk, b"payload", b"", b"").unwrap();
            let message = version.verify(&pk, &token, None, b"").unwrap();
            assert_eq!(message, b"payload");
        }
    }

    #[test]
    fn test_key_version_mismatch() {
        let key = local_key(Version::V2);
        let err = Version::V4.encrypt(&key, b"m", b"", b"").unwrap_err();
        assert!(matches!(
            err,
            CoreError::VersionMismatch {
                expected: Version::V4,
                found: Version::V2
            }
        ));
    }

    #[test]
    fn test_header_mismatch_before_crypto() {
        let v4 = local_key(Version::V4);
        let token = Version::V4.encrypt(&v4, b"m", b"", b"").unwrap();

        let v3 = local_key(Version::V3);
        assert!(matches!(
            Version::V3.decrypt(&v3, &token, None, b""),
            Err(CoreError::HeaderMismatch { expected: "v3.local." })
        ));
    }

    #[test]
    fn test_implicit_assertion_rejected_on_old_versions() {
        for version in [Version::V1, Version::V2] {
            let key = local_key(version);
            assert!(matches!(
                version.encrypt(&key, b"m", b"", b"ia"),
                Err(CoreError::ImplicitAssertionUnsupported(v)) if v == version
            ));
        }
    }

    #[test]
    fn test_implicit_assertion_is_authenticated() {
        for version in [Version::V3, Version::V4] {
            let key = local_key(version);
            let token = version.encrypt(&key, b"m", b"", b"context-a").unwrap();
            assert_eq!(version.decrypt(&key, &token, None, b"context-a").unwrap(), b"m");
            assert!(matches!(
                version.decrypt(&key, &token, None, b"context-b"),
                Err(CoreError::AuthenticationFailed)
            ));

            let sk = secret_key(version, 9);
            let pk = sk.public_key().unwrap();
            let token = version.sign(&sk, b"m", b"", b"context-a").unwrap();
            assert!(version.verify(&pk, &token, None, b"context-a").is_ok());
            assert!(matches!(
                version.verify(&pk, &token, None, b""),
                Err(CoreError::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn test_expected_footer_mismatch() {
        let key = local_key(Version::V4);
        let token = Version::V4.encrypt(&key, b"m", b"kid-1", b"").unwrap();
        assert!(matches!(
            Version::V4.decrypt(&key, &token, Some(b"kid-2"), b""),
            Err(CoreError::FooterMismatch)
        ));
        // No expectation: footer still authenticated, decrypt succeeds.
        assert!(Version::V4.decrypt(&key, &token, None, b"").is_ok());
    }

    #[test]
    fn test_short_payload_is_malformed() {
        for version in Version::ALL {
            let key = local_key(version);
            let token = Token::new(version.header(Purpose::Local), vec![0u8; 8], Vec::new());
            assert!(matches!(
                version.decrypt(&key, &token, None, b""),
                Err(CoreError::MalformedToken(_))
            ));
        }
    }

    #[test]
    fn test_footer_absence_equivalence() {
        for version in Version::ALL {
            let key = local_key(version);
            let mut rng_a = StdRng::seed_from_u64(1234);
            let mut rng_b = StdRng::seed_from_u64(1234);
            let a = version.encrypt_with_rng(&key, b"same", b"", b"", &mut rng_a).unwrap();
            let b = version.encrypt_with_rng(&key, b"same", b"", b"", &mut rng_b).unwrap();
            assert_eq!(a.to_string(), b.to_string());
            assert_eq!(a.to_string().split('.').count(), 3);
        }
    }

    #[test]
    fn test_split_tail() {
        let (head, tail) = split_tail(b"abcdef", 2).unwrap();
        assert_eq!(head, b"abcd");
        assert_eq!(tail, b"ef");
        assert!(split_tail(b"a", 2).is_err());
    }
}
