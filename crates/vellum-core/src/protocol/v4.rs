//! v4: XChaCha20 + keyed BLAKE2b (local), Ed25519 (public).

use blake2::digest::consts::{U32, U56};
use blake2::digest::Mac;
use blake2::Blake2bMac;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::XChaCha20;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::split_tail;
use crate::error::{CoreError, Result};
use crate::pae::pae;
use crate::version::{Header, Purpose, Version};

const LOCAL: Header = Header::new(Version::V4, Purpose::Local);
const PUBLIC: Header = Header::new(Version::V4, Purpose::Public);

const NONCE_LEN: usize = 32;
const TAG_LEN: usize = 32;
const SIGNATURE_LEN: usize = 64;

const ENCRYPTION_INFO: &[u8] = b"paseto-encryption-key";
const AUTH_INFO: &[u8] = b"paseto-auth-key-for-aead";

struct SplitKeys {
    ek: Zeroizing<[u8; 32]>,
    stream_nonce: [u8; 24],
    ak: Zeroizing<[u8; 32]>,
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
        return Err(CoreError::MalformedToken("v4.local payload too short".into()));
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

pub(super) fn sign(
    key: &SigningKey,
    message: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Vec<u8> {
    let m2 = pae(&[PUBLIC.as_bytes(), message, footer, implicit_assertion]);
    let signature = key.sign(&m2);

    let mut payload = Vec::with_capacity(message.len() + SIGNATURE_LEN);
    payload.extend_from_slice(message);
    payload.extend_from_slice(&signature.to_bytes());
    payload
}

pub(super) fn verify(
    key: &VerifyingKey,
    payload: &[u8],
    footer: &[u8],
    implicit_assertion: &[u8],
) -> Result<Vec<u8>> {
    let (message, signature) = split_tail(payload, SIGNATURE_LEN)?;
    let signature =
        Signature::from_slice(signature).map_err(|_| CoreError::AuthenticationFailed)?;
    let m2 = pae(&[PUBLIC.as_bytes(), message, footer, implicit_assertion]);
    key.verify_strict(&m2, &signature)
        .map_err(|_| CoreError::AuthenticationFailed)?;
    Ok(message.to_vec())
}

fn split_keys(key: &[u8; 32], nonce: &[u8]) -> Result<SplitKeys> {
    let mut mac = <Blake2bMac<U56> as Mac>::new_from_slice(key)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    mac.update(ENCRYPTION_INFO);
    mac.update(nonce);
    let mut tmp = Zeroizing::new([0u8; 56]);
    tmp.copy_from_slice(&mac.finalize().into_bytes());

    let mut ek = Zeroizing::new([0u8; 32]);
    ek.copy_from_slice(&tmp[..32]);
    let mut stream_nonce = [0u8; 24];
    stream_nonce.copy_from_slice(&tmp[32..]);

    let mut mac = <Blake2bMac<U32> as Mac>::new_from_slice(key)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    mac.update(AUTH_INFO);
    mac.update(nonce);
    let mut ak = Zeroizing::new([0u8; 32]);
    ak.copy_from_slice(&mac.finalize().into_bytes());

    Ok(SplitKeys {
        ek,
        stream_nonce,
        ak,
    })
}

fn apply_keystream(keys: &SplitKeys, buf: &mut [u8]) -> Result<()> {
    let mut cipher = XChaCha20::new_from_slices(keys.ek.as_ref(), &keys.stream_nonce)
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
    let mut mac = <Blake2bMac<U32> as Mac>::new_from_slice(keys.ak.as_ref())
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
        let payload = encrypt(&[8u8; 32], b"hello world", b"", b"", &mut rng).unwrap();
        assert_eq!(payload.len(), NONCE_LEN + 11 + TAG_LEN);
    }

    #[test]
    fn test_ciphertext_differs_from_plaintext() {
        let mut rng = StdRng::seed_from_u64(0);
        let payload = encrypt(&[8u8; 32], b"hello world", b"", b"", &mut rng).unwrap();
        assert_ne!(&payload[NONCE_LEN..NONCE_LEN + 11], b"hello world");
    }

    #[test]
    fn test_every_payload_byte_is_authenticated() {
        let mut rng = StdRng::seed_from_u64(2);
        let payload = encrypt(&[8u8; 32], b"abc", b"foot", b"ia", &mut rng).unwrap();
        for i in 0..payload.len() {
            let mut tampered = payload.clone();
            tampered[i] ^= 0x80;
            assert!(matches!(
                decrypt(&[8u8; 32], &tampered, b"foot", b"ia"),
                Err(CoreError::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn test_signature_covers_implicit_assertion() {
        let sk = SigningKey::from_bytes(&[1u8; 32]);
        let payload = sign(&sk, b"msg", b"", b"ia");
        let vk = sk.verifying_key();
        assert_eq!(verify(&vk, &payload, b"", b"ia").unwrap(), b"msg");
        assert!(verify(&vk, &payload, b"", b"").is_err());
    }
}
