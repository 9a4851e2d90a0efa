//! # Ed25519 Signatures
//!
//! Twisted Edwards curve key pairs for the Substrate, Solana and NEAR
//! session keys. Signatures are deterministic: the same key and message
//! always produce the same 64 bytes.

use crate::CryptoError;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        // Validate it's a valid point
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Self::from_bytes(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify a 64-byte signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 keypair.
#[derive(Clone)]
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret seed (32 bytes).
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Create from the 64-byte `seed || public key` form used by Solana and
    /// NEAR wallets. Fails if the public half does not match the seed.
    pub fn from_keypair_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 64] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 64,
            actual: bytes.len(),
        })?;
        let signing_key =
            SigningKey::from_keypair_bytes(&bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Get public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message (deterministic - no RNG needed).
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Get secret seed (for serialization).
    pub fn to_seed(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// `seed || public key` (64 bytes).
    pub fn to_keypair_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &hex::encode(self.public_key().as_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify() {
        let keypair = Ed25519KeyPair::generate();
        let message = b"Hello, Ed25519!";

        let signature = keypair.sign(message);
        let result = keypair.public_key().verify(message, &signature);

        assert!(result.is_ok());
    }

    #[test]
    fn test_wrong_message_fails() {
        let keypair = Ed25519KeyPair::generate();

        let signature = keypair.sign(b"message1");
        let result = keypair.public_key().verify(b"message2", &signature);

        assert_eq!(result, Err(CryptoError::SignatureVerificationFailed));
    }

    #[test]
    fn test_wrong_key_fails() {
        let keypair1 = Ed25519KeyPair::generate();
        let keypair2 = Ed25519KeyPair::generate();
        let message = b"test";

        let signature = keypair1.sign(message);
        let result = keypair2.public_key().verify(message, &signature);

        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let keypair = Ed25519KeyPair::generate();
        let signature = keypair.sign(b"m");
        assert_eq!(
            keypair.public_key().verify(b"m", &signature[..63]),
            Err(CryptoError::InvalidSignatureFormat)
        );
    }

    #[test]
    fn test_deterministic_signatures() {
        let keypair = Ed25519KeyPair::from_seed([0xABu8; 32]);
        let message = b"deterministic test";

        assert_eq!(keypair.sign(message), keypair.sign(message));
    }

    #[test]
    fn test_keypair_bytes_roundtrip() {
        let original = Ed25519KeyPair::generate();
        let bytes = original.to_keypair_bytes();
        assert_eq!(&bytes[..32], &original.to_seed());
        assert_eq!(&bytes[32..], original.public_key().as_bytes());

        let restored = Ed25519KeyPair::from_keypair_bytes(&bytes).unwrap();
        assert_eq!(original.public_key(), restored.public_key());
    }

    #[test]
    fn test_keypair_bytes_mismatched_public_half() {
        let mut bytes = Ed25519KeyPair::generate().to_keypair_bytes();
        let other = Ed25519KeyPair::generate();
        bytes[32..].copy_from_slice(other.public_key().as_bytes());

        assert!(Ed25519KeyPair::from_keypair_bytes(&bytes).is_err());
    }
}
