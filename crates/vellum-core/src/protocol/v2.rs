//! v2: XChaCha20-Poly1305 (local), Ed25519 (public).

use blake2::digest::consts::U24;
use blake2::digest::Mac;
use blake2::Blake2bMac;
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{KeyInit, XChaCha20Poly1305, XNonce};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use super::split_tail;
use crate::error::{CoreError, Result};
use crate::pae::pae;
use crate::version::{Header, Purpose, Version};

const LOCAL: Header = Header::new(Version::V2, Purpose::Local);
const PUBLIC: Header = Header::new(Version::V2, Purpose::Public);

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;
const SIGNATURE_LEN: usize = 64;

pub(super) fn encrypt<R: RngCore + CryptoRng>(
    key: &[u8; 32],
    message: &[u8],
    footer: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut b = Zeroizing::new([0u8; NONCE_LEN]);
    rng.fill_bytes(b.as_mut());

    let mut nonce_mac = <Blake2bMac<U24> as Mac>::new_from_slice(b.as_ref())
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    nonce_mac.update(message);
    let nonce = nonce_mac.finalize().into_bytes();

    let aad = pae(&[LOCAL.as_bytes(), nonce.as_slice(), footer]);
    let cipher = XChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), Payload { msg: message, aad: &aad })
        .map_err(|e| CoreError::Crypto(e.to_string()))?;

    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    Ok(payload)
}

pub(super) fn decrypt(key: &[u8; 32], payload: &[u8], footer: &[u8]) -> Result<Vec<u8>> {
    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(CoreError::MalformedToken("v2.local payload too short".into()));
    }
    let (nonce, ciphertext) = payload.split_at(NONCE_LEN);

    let aad = pae(&[LOCAL.as_bytes(), nonce, footer]);
    let cipher = XChaCha20Poly1305::new_from_slice(key)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    cipher
        .decrypt(XNonce::from_slice(nonce), Payload { msg: ciphertext, aad: &aad })
        .map_err(|_| CoreError::AuthenticationFailed)
}

pub(super) fn sign(key: &SigningKey, message: &[u8], footer: &[u8]) -> Vec<u8> {
    let signature = key.sign(&pae(&[PUBLIC.as_bytes(), message, footer]));

    let mut payload = Vec::with_capacity(message.len() + SIGNATURE_LEN);
    payload.extend_from_slice(message);
    payload.extend_from_slice(&signature.to_bytes());
    payload
}

pub(super) fn verify(key: &VerifyingKey, payload: &[u8], footer: &[u8]) -> Result<Vec<u8>> {
    let (message, signature) = split_tail(payload, SIGNATURE_LEN)?;
    let signature =
        Signature::from_slice(signature).map_err(|_| CoreError::AuthenticationFailed)?;
    key.verify_strict(&pae(&[PUBLIC.as_bytes(), message, footer]), &signature)
        .map_err(|_| CoreError::AuthenticationFailed)?;
    Ok(message.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_payload_layout() {
        let mut rng = StdRng::seed_from_u64(0);
        let payload = encrypt(&[3u8; 32], b"abc", b"", &mut rng).unwrap();
        assert_eq!(payload.len(), NONCE_LEN + 3 + TAG_LEN);
    }

    #[test]
    fn test_signature_layout() {
        let sk = SigningKey::from_bytes(&[9u8; 32]);
        let payload = sign(&sk, b"msg", b"");
        assert_eq!(payload.len(), 3 + SIGNATURE_LEN);
        assert_eq!(&payload[..3], b"msg");
        assert_eq!(verify(&sk.verifying_key(), &payload, b"").unwrap(), b"msg");
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let mut rng = StdRng::seed_from_u64(1);
        let payload = encrypt(&[3u8; 32], b"abc", b"", &mut rng).unwrap();
        assert!(matches!(
            decrypt(&[4u8; 32], &payload, b""),
            Err(CoreError::AuthenticationFailed)
        ));
    }
}
