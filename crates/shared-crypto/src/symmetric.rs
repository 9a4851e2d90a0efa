//! # Symmetric Encryption
//!
//! XChaCha20-Poly1305 sealing of session records at rest.
//!
//! The 192-bit nonce is random per message, so one key may seal an
//! unbounded number of records.

use crate::CryptoError;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

/// XChaCha20 nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Nonce for encryption.
#[derive(Clone)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate random nonce (safe with XChaCha20's 192-bit nonce).
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Encrypt plaintext with XChaCha20-Poly1305.
///
/// Returns (ciphertext, nonce).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, Nonce), CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::generate();

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok((ciphertext, nonce))
}

/// Decrypt ciphertext with XChaCha20-Poly1305.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if decryption fails.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &Nonce) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(XNonce::from_slice(nonce.as_bytes()), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Encrypt and frame as `nonce || ciphertext`.
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (ciphertext, nonce) = encrypt(key, plaintext)?;
    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(nonce.as_bytes());
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Inverse of [`seal`].
pub fn open(key: &SecretKey, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < NONCE_LEN {
        return Err(CryptoError::DecryptionFailed(format!(
            "sealed value shorter than {NONCE_LEN}-byte nonce"
        )));
    }
    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    let mut bytes = [0u8; NONCE_LEN];
    bytes.copy_from_slice(nonce);
    decrypt(key, ciphertext, &Nonce::from_bytes(bytes))
}
