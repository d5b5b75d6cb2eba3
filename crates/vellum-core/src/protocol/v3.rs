//! v3: AES-256-CTR + HMAC-SHA384 with HKDF (local), ECDSA P-384 (public).

use ctr::cipher::{KeyIvInit, StreamCipher};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use p384::ecdsa::signature::{RandomizedSigner, Verifier};
use p384::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use sha2::Sha384;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::split_tail;
use crate::error::{CoreError, Result};
use crate::pae::pae;
use crate::version::{Header, Purpose, Version};

type HmacSha384 = Hmac<Sha384>;
type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

const LOCAL: Header = Header::new(Version::V3, Purpose::Local);
const PUBLIC: Header = Header::new(Version::V3, Purpose::Public);

const NONCE_LEN: usize = 32;
const TAG_LEN: usize = 48;
const SIGNATURE_LEN: usize = 96;

const ENCRYPTION_INFO: &[u8] = b"paseto-encryption-key";
const AUTH_INFO: &[u8] = b"paseto-auth-key-for-aead";

/// Derived per-token keys.
struct SplitKeys {
    ek: Zeroizing<[u8; 32]>,
    counter_nonce: [u8; 16],
    ak: Zeroizing<[u8; 48]>,
}

pub(super) fn encrypt<R: RngCore + CryptoRng>(
    key: &[u8; 32],
    message: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let keys = split_keys(key, &nonce)?;
    let mut ciphertext = message.to_vec();
    apply_keystream(&keys, &mut ciphertext)?;
    let tag = tag(&keys, &nonce, &ciphertext, footer, implicit_assertion)?;

    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len() + TAG_LEN);
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    payload.extend_from_slice(&tag);
    Ok(payload)
}

pub(super) fn decrypt(
    key: &[u8; 32],
    payload: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Result<Vec<u8>> {
    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(CoreError::MalformedToken("v3.local payload too short".into()));
    }
    let (nonce, rest) = payload.split_at(NONCE_LEN);
    let (ciphertext, given_tag) = split_tail(rest, TAG_LEN)?;

    let keys = split_keys(key, nonce)?;
    let expected_tag = tag(&keys, nonce, ciphertext, footer, implicit_assertion)?;
    if !bool::from(expected_tag.as_slice().ct_eq(given_tag)) {
        return Err(CoreError::AuthenticationFailed);
    }

    let mut message = ciphertext.to_vec();
    apply_keystream(&keys, &mut message)?;
    Ok(message)
}

pub(super) fn sign<R: RngCore + CryptoRng>(
    key: &SigningKey,
    message: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let public = key.verifying_key().to_encoded_point(true);
    let m2 = pae(&[
        public.as_bytes(),
        PUBLIC.as_bytes(),
        message,
        footer,
        implicit_assertion,
    ]);
    let signature: Signature = key
        .try_sign_with_rng(rng, &m2)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;

    let mut payload = Vec::with_capacity(message.len() + SIGNATURE_LEN);
    payload.extend_from_slice(message);
    payload.extend_from_slice(&signature.to_bytes());
    Ok(payload)
}

/// `public` is the compressed SEC1 encoding of `key`.
pub(super) fn verify(
    key: &VerifyingKey,
    public: &[u8],
    payload: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Result<Vec<u8>> {
    let (message, signature) = split_tail(payload, SIGNATURE_LEN)?;
    let signature =
        Signature::from_slice(signature).map_err(|_| CoreError::AuthenticationFailed)?;
    let m2 = pae(&[public, PUBLIC.as_bytes(), message, footer, implicit_assertion]);
    key.verify(&m2, &signature)
        .map_err(|_| CoreError::AuthenticationFailed)?;
    Ok(message.to_vec())
}

fn split_keys(key: &[u8; 32], nonce: &[u8]) -> Result<SplitKeys> {
    let hk = Hkdf::<Sha384>::new(None, key);

    let mut tmp = Zeroizing::new([0u8; 48]);
    hk.expand_multi_info(&[ENCRYPTION_INFO, nonce], tmp.as_mut())
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    let mut ek = Zeroizing::new([0u8; 32]);
    ek.copy_from_slice(&tmp[..32]);
    let mut counter_nonce = [0u8; 16];
    counter_nonce.copy_from_slice(&tmp[32..]);

    let mut ak = Zeroizing::new([0u8; 48]);
    hk.expand_multi_info(&[AUTH_INFO, nonce], ak.as_mut())
        .map_err(|e| CoreError::Crypto(e.to_string()))?;

    Ok(SplitKeys {
        ek,
        counter_nonce,
        ak,
    })
}

fn apply_keystream(keys: &SplitKeys, buf: &mut [u8]) -> Result<()> {
    let mut cipher = Aes256Ctr::new_from_slices(keys.ek.as_ref(), &keys.counter_nonce)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn tag(
    keys: &SplitKeys,
    nonce: &[u8],
    ciphertext: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Result<Vec<u8>> {
    let mut mac = HmacSha384::new_from_slice(keys.ak.as_ref())
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    mac.update(&pae(&[
        LOCAL.as_bytes(),
        nonce,
        ciphertext,
        footer,
        implicit_assertion,
    ]));
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_payload_layout() {
        let mut rng = StdRng::seed_from_u64(0);
        let payload = encrypt(&[5u8; 32], b"abcd", b"", b"", &mut rng).unwrap();
        assert_eq!(payload.len(), NONCE_LEN + 4 + TAG_LEN);
    }

    #[test]
    fn test_signature_binds_public_key() {
        let mut rng = StdRng::seed_from_u64(1);
        let sk = SigningKey::random(&mut rng);
        let other = SigningKey::random(&mut rng);
        let payload = sign(&sk, b"msg", b"", b"", &mut rng).unwrap();
        assert_eq!(payload.len(), 3 + SIGNATURE_LEN);

        let public = sk.verifying_key().to_encoded_point(true);
        assert!(verify(sk.verifying_key(), public.as_bytes(), &payload, b"", b"").is_ok());

        // Claiming another key's encoding changes the signed bytes.
        let other_public = other.verifying_key().to_encoded_point(true);
        assert!(verify(sk.verifying_key(), other_public.as_bytes(), &payload, b"", b"").is_err());
    }

    #[test]
    fn test_distinct_nonces_give_distinct_keys() {
        let a = split_keys(&[1u8; 32], &[0u8; 32]).unwrap();
        let b = split_keys(&[1u8; 32], &[1u8; 32]).unwrap();
        assert_ne!(a.ek.as_ref(), b.ek.as_ref());
        assert_ne!(a.counter_nonce, b.counter_nonce);
        assert_ne!(a.ak.as_ref(), b.ak.as_ref());
    }
}
