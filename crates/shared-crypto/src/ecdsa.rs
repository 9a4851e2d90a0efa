//! # ECDSA Signatures (secp256k1)
//!
//! secp256k1 key pairs for the Ethereum and Cosmos session keys.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2), enforced on verification
//! - Signing is always over a 32-byte prehash chosen by the caller
//!   (EIP-712 digest for Ethereum, SHA-256 of the sign doc for Cosmos)

use crate::digest::{hash160, keccak256};
use crate::encoding;
use crate::CryptoError;
use k256::ecdsa::{signature::hazmat::PrehashVerifier, RecoveryId, Signature, SigningKey, VerifyingKey};
use std::fmt;

/// Compressed secp256k1 public key (33 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey([u8; 33]);

impl Secp256k1PublicKey {
    /// Parse a SEC1 point, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&key))
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }

    fn verifying_key(&self) -> Result<VerifyingKey, CryptoError> {
        VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Get raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Uncompressed SEC1 encoding (65 bytes, leading 0x04).
    pub fn to_uncompressed(&self) -> Result<[u8; 65], CryptoError> {
        let point = self.verifying_key()?.to_encoded_point(false);
        let mut bytes = [0u8; 65];
        bytes.copy_from_slice(point.as_bytes());
        Ok(bytes)
    }

    /// Ethereum address: EIP-55 checksum of keccak256(x || y)[12..].
    pub fn eth_address(&self) -> Result<String, CryptoError> {
        let uncompressed = self.to_uncompressed()?;
        let hash = keccak256(&uncompressed[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        Ok(encoding::to_checksum_address(&address))
    }

    /// Cosmos account address: bech32(prefix, RIPEMD-160(SHA-256(compressed))).
    pub fn cosmos_address(&self, prefix: &str) -> Result<String, CryptoError> {
        encoding::bech32_encode(prefix, &hash160(&self.0))
    }

    /// Verify a 64-byte `r || s` signature over a 32-byte prehash.
    pub fn verify_prehash(&self, prehash: &[u8; 32], signature: &[u8]) -> Result<(), CryptoError> {
        let sig = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        if sig.normalize_s().is_some() {
            // High-S signatures are malleable twins of a valid one.
            return Err(CryptoError::InvalidSignatureFormat);
        }
        self.verifying_key()?
            .verify_prehash(prehash, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// ECDSA signature with its public key recovery id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    rs: [u8; 64],
    recovery_id: u8,
}

impl RecoverableSignature {
    /// `r || s` (64 bytes).
    pub fn rs(&self) -> &[u8; 64] {
        &self.rs
    }

    /// Recovery id (0 or 1).
    pub fn recovery_id(&self) -> u8 {
        self.recovery_id
    }

    /// Ethereum wire form `r || s || v` with `v = 27 + recovery_id`.
    pub fn to_eth_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&self.rs);
        out[64] = 27 + self.recovery_id;
        out
    }

    /// Parse `r || s || v`, accepting `v` in {0, 1, 27, 28}.
    pub fn from_eth_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 65 {
            return Err(CryptoError::InvalidSignatureFormat);
        }
        let recovery_id = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            _ => return Err(CryptoError::InvalidSignatureFormat),
        };
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&bytes[..64]);
        Ok(Self { rs, recovery_id })
    }

    /// Recover the signer's public key from a 32-byte prehash.
    pub fn recover(&self, prehash: &[u8; 32]) -> Result<Secp256k1PublicKey, CryptoError> {
        let sig = Signature::from_slice(&self.rs).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        if sig.normalize_s().is_some() {
            return Err(CryptoError::InvalidSignatureFormat);
        }
        let recid =
            RecoveryId::from_byte(self.recovery_id).ok_or(CryptoError::InvalidSignatureFormat)?;
        let key = VerifyingKey::recover_from_prehash(prehash, &sig, recid)
            .map_err(|_| CryptoError::SignatureVerificationFailed)?;
        Ok(Secp256k1PublicKey::from_verifying_key(&key))
    }
}

/// secp256k1 ECDSA keypair.
#[derive(Clone)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Create from a secret key slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Self::from_bytes(bytes)
    }

    /// Get public key (compressed, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash (deterministic RFC 6979, low-S).
    pub fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<RecoverableSignature, CryptoError> {
        let (mut sig, mut recid) = self
            .signing_key
            .sign_prehash_recoverable(prehash)
            .map_err(|_| CryptoError::InvalidPrivateKey)?;

        if let Some(normalized) = sig.normalize_s() {
            sig = normalized;
            recid = RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced());
        }

        Ok(RecoverableSignature {
            rs: sig.to_bytes().into(),
            recovery_id: recid.to_byte(),
        })
    }

    /// Get secret key bytes (for serialization).
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes().into()
    }
}

impl fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1KeyPair")
            .field("public_key", &hex::encode(self.public_key().as_bytes()))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
