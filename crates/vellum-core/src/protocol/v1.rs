//! v1: AES-256-CTR + HMAC-SHA384 (local), RSA-PSS-SHA384 (public).

use ctr::cipher::{KeyIvInit, StreamCipher};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use rsa::{Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha384};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::split_tail;
use crate::error::{CoreError, Result};
use crate::pae::pae;
use crate::version::{Header, Purpose, Version};

type HmacSha384 = Hmac<Sha384>;
type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

const LOCAL: Header = Header::new(Version::V1, Purpose::Local);
const PUBLIC: Header = Header::new(Version::V1, Purpose::Public);

const NONCE_LEN: usize = 32;
const TAG_LEN: usize = 48;
const SIGNATURE_LEN: usize = 256;

const ENCRYPTION_INFO: &[u8] = b"paseto-encryption-key";
const AUTH_INFO: &[u8] = b"paseto-auth-key-for-aead";

pub(super) fn encrypt<R: RngCore + CryptoRng>(
    key: &[u8; 32],
    message: &[u8],
    footer: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let mut b = Zeroizing::new([0u8; 32]);
    rng.fill_bytes(b.as_mut());

    // Nonce is keyed by fresh randomness over the message.
    let mut nonce_mac = hmac(b.as_ref())?;
    nonce_mac.update(message);
    let nonce_full = nonce_mac.finalize().into_bytes();
    let nonce = &nonce_full[..NONCE_LEN];

    let (ek, ak) = split_keys(key, nonce)?;

    let mut ciphertext = message.to_vec();
    let mut cipher = Aes256Ctr::new_from_slices(ek.as_ref(), &nonce[16..])
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    cipher.apply_keystream(&mut ciphertext);

    let tag = tag(ak.as_ref(), nonce, &ciphertext, footer)?;

    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len() + TAG_LEN);
    payload.extend_from_slice(nonce);
    payload.extend_from_slice(&ciphertext);
    payload.extend_from_slice(&tag);
    Ok(payload)
}

pub(super) fn decrypt(key: &[u8; 32], payload: &[u8], footer: &[u8]) -> Result<Vec<u8>> {
    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(CoreError::MalformedToken("v1.local payload too short".into()));
    }
    let (nonce, rest) = payload.split_at(NONCE_LEN);
    let (ciphertext, given_tag) = split_tail(rest, TAG_LEN)?;

    let (ek, ak) = split_keys(key, nonce)?;
    let expected_tag = tag(ak.as_ref(), nonce, ciphertext, footer)?;
    if !bool::from(expected_tag.as_slice().ct_eq(given_tag)) {
        return Err(CoreError::AuthenticationFailed);
    }

    let mut message = ciphertext.to_vec();
    let mut cipher = Aes256Ctr::new_from_slices(ek.as_ref(), &nonce[16..])
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    cipher.apply_keystream(&mut message);
    Ok(message)
}

pub(super) fn sign<R: RngCore + CryptoRng>(
    key: &RsaPrivateKey,
    message: &[u8],
    footer: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let digest = Sha384::digest(pae(&[PUBLIC.as_bytes(), message, footer]));
    let signature = key
        .sign_with_rng(rng, Pss::new::<Sha384>(), &digest)
        .map_err(|e| CoreError::Crypto(e.to_string()))?;

    let mut payload = Vec::with_capacity(message.len() + signature.len());
    payload.extend_from_slice(message);
    payload.extend_from_slice(&signature);
    Ok(payload)
}

pub(super) fn verify(key: &RsaPublicKey, payload: &[u8], footer: &[u8]) -> Result<Vec<u8>> {
    let (message, signature) = split_tail(payload, SIGNATURE_LEN)?;
    let digest = Sha384::digest(pae(&[PUBLIC.as_bytes(), message, footer]));
    key.verify(Pss::new::<Sha384>(), &digest, signature)
        .map_err(|_| CoreError::AuthenticationFailed)?;
    Ok(message.to_vec())
}

fn hmac(key: &[u8]) -> Result<HmacSha384> {
    HmacSha384::new_from_slice(key).map_err(|e| CoreError::Crypto(e.to_string()))
}

/// Derive the encryption and authentication keys, salted with half the nonce.
fn split_keys(key: &[u8; 32], nonce: &[u8]) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>)> {
    let hk = Hkdf::<Sha384>::new(Some(&nonce[..16]), key);
    let mut ek = Zeroizing::new([0u8; 32]);
    let mut ak = Zeroizing::new([0u8; 32]);
    hk.expand(ENCRYPTION_INFO, ek.as_mut())
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    hk.expand(AUTH_INFO, ak.as_mut())
        .map_err(|e| CoreError::Crypto(e.to_string()))?;
    Ok((ek, ak))
}

fn tag(ak: &[u8], nonce: &[u8], ciphertext: &[u8], footer: &[u8]) -> Result<Vec<u8>> {
    let mut mac = hmac(ak)?;
    mac.update(&pae(&[LOCAL.as_bytes(), nonce, ciphertext, footer]));
    Ok(mac.finalize().into_bytes().to_vec())
}
