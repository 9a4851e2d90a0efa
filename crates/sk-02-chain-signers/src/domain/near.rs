//! # NEAR Session Keys
//!
//! ed25519 keys in NEAR's `ed25519:<base58>` notation. Action signatures
//! are base64.

use serde::{Deserialize, Serialize};
use shared_crypto::encoding::{from_base58, from_base64, to_base58, to_base64};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey};
use shared_types::{canonical_json, ActionPayload, ChainBase};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::SignerError;
use crate::domain::session_key::SessionKey;

/// Curve tag prefixed to NEAR keys.
pub const KEY_PREFIX: &str = "ed25519:";

/// Persisted NEAR key: `{"privateKey": "ed25519:<base58 of seed || pubkey>"}`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct NearKeyRecord {
    /// NEAR secret key string.
    pub private_key: String,
}

impl fmt::Debug for NearKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NearKeyRecord(***)")
    }
}

/// A NEAR session key.
#[derive(Debug)]
pub struct NearKey {
    keypair: Ed25519KeyPair,
    address: String,
}

impl NearKey {
    fn from_keypair(keypair: Ed25519KeyPair) -> Self {
        let address = format!("{KEY_PREFIX}{}", to_base58(keypair.public_key().as_bytes()));
        Self { keypair, address }
    }
}

/// Parse an `ed25519:<base58>` public key.
pub fn parse_public_key(address: &str) -> Result<Ed25519PublicKey, SignerError> {
    let encoded = address
        .strip_prefix(KEY_PREFIX)
        .ok_or_else(|| SignerError::MalformedSignature(format!("not an ed25519 key: {address}")))?;
    from_base58(encoded)
        .and_then(|bytes| Ed25519PublicKey::from_slice(&bytes))
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))
}

impl SessionKey for NearKey {
    const FAMILY: ChainBase = ChainBase::Near;
    type Record = NearKeyRecord;

    fn generate(_chain_id: &str) -> Result<Self, SignerError> {
        Ok(Self::from_keypair(Ed25519KeyPair::generate()))
    }

    fn from_record(_chain_id: &str, record: Self::Record) -> Result<Self, SignerError> {
        let encoded = record
            .private_key
            .strip_prefix(KEY_PREFIX)
            .ok_or_else(|| SignerError::InvalidKeyRecord("missing ed25519: prefix".to_string()))?;
        let bytes =
            from_base58(encoded).map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        let keypair = Ed25519KeyPair::from_keypair_bytes(&bytes)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        Ok(Self::from_keypair(keypair))
    }

    fn to_record(&self) -> Self::Record {
        NearKeyRecord {
            private_key: format!("{KEY_PREFIX}{}", to_base58(&self.keypair.to_keypair_bytes())),
        }
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn sign_action(&self, payload: &ActionPayload) -> Result<String, SignerError> {
        let message = canonical_json(payload)?;
        Ok(to_base64(&self.keypair.sign(message.as_bytes())))
    }

    fn verify_action(
        address: &str,
        payload: &ActionPayload,
        signature: &str,
    ) -> Result<(), SignerError> {
        let public_key = parse_public_key(address)?;
        let signature =
            from_base64(signature).map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
        let message = canonical_json(payload)?;

        public_key
            .verify(message.as_bytes(), &signature)
            .map_err(|_| SignerError::SignatureVerificationFailed)
    }
}
