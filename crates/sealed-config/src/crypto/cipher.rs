//! AES-256-GCM-SIV sealing and opening of raw byte payloads.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is authenticated and
//! nonce-misuse-resistant. A fresh random nonce is still drawn for every call,
//! so sealing the same plaintext twice under the same key yields different
//! payloads.
//!
//! **Do NOT replace the random nonce with a counter or a fixed value.** The
//! salting guarantee of every envelope rests on it.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, OsRng},
    Aes256GcmSiv, Nonce,
};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Shortest payload that can possibly open: a nonce and a tag around an empty
/// ciphertext.
pub const MIN_PAYLOAD_LEN: usize = NONCE_LEN + TAG_LEN;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The payload is too short to hold a nonce and a tag.
    #[error("payload too short: expected at least {MIN_PAYLOAD_LEN} bytes, got {0}")]
    PayloadTooShort(usize),

    /// AES-GCM-SIV encryption or decryption failed.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Seal `plaintext` under `key`.
///
/// Returns `nonce || ciphertext || tag`. A random 96-bit nonce is generated per
/// call via the OS CSPRNG.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (should be unreachable
/// with a valid key and nonce).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;

    // Use OsRng for a cryptographically secure random nonce.
    use aes_gcm_siv::aead::rand_core::RngCore;
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    seal_with_nonce(&cipher, &nonce, plaintext)
}

/// Open a payload produced by [`encrypt`], returning the plaintext bytes.
///
/// The tag is verified before any plaintext is released.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`CipherError::PayloadTooShort`] if `payload` is shorter than [`MIN_PAYLOAD_LEN`].
/// Returns [`CipherError::AeadFailure`] if authentication fails (wrong key or tampered data).
pub fn decrypt(key: &[u8], payload: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key)?;
    if payload.len() < MIN_PAYLOAD_LEN {
        return Err(CipherError::PayloadTooShort(payload.len()));
    }

    let (nonce, sealed) = payload.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CipherError::AeadFailure)
}

fn seal_with_nonce(
    cipher: &Aes256GcmSiv,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let sealed = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
    payload.extend_from_slice(nonce);
    payload.extend_from_slice(&sealed);
    Ok(payload)
}

fn build_cipher(key: &[u8]) -> Result<Aes256GcmSiv, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength(key.len()));
    }
    Aes256GcmSiv::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength(key.len()))
}
