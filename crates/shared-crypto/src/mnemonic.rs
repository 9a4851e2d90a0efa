//! # Mnemonic Key Material
//!
//! BIP-39 phrases as used by Substrate session keys. A phrase is never
//! stretched with the BIP-39 seed function; Substrate derives its 32-byte
//! mini-secret as `PBKDF2-HMAC-SHA512(entropy, "mnemonic", 2048)[..32]`.

use crate::signatures::Ed25519KeyPair;
use crate::CryptoError;
use bip39::{Language, MnemonicType};
use sha2::Sha512;
use std::fmt;
use zeroize::Zeroizing;

const PBKDF2_ROUNDS: u32 = 2048;
const PBKDF2_SALT: &[u8] = b"mnemonic";

/// A validated English BIP-39 phrase.
pub struct Mnemonic {
    inner: bip39::Mnemonic,
}

impl Mnemonic {
    /// Generate a fresh 12-word phrase.
    pub fn generate() -> Self {
        Self {
            inner: bip39::Mnemonic::new(MnemonicType::Words12, Language::English),
        }
    }

    /// Parse and checksum-validate a phrase.
    pub fn from_phrase(phrase: &str) -> Result<Self, CryptoError> {
        let inner = bip39::Mnemonic::from_phrase(phrase, Language::English)
            .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;
        Ok(Self { inner })
    }

    /// The phrase text.
    pub fn phrase(&self) -> &str {
        self.inner.phrase()
    }

    /// Substrate mini-secret derived from the phrase entropy.
    pub fn mini_secret(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 64]);
        pbkdf2::pbkdf2_hmac::<Sha512>(self.inner.entropy(), PBKDF2_SALT, PBKDF2_ROUNDS, &mut out[..]);

        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(&out[..32]);
        secret
    }

    /// Ed25519 key pair seeded by the mini-secret.
    pub fn ed25519_keypair(&self) -> Ed25519KeyPair {
        Ed25519KeyPair::from_seed(*self.mini_secret())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mnemonic([REDACTED])")
    }
}
