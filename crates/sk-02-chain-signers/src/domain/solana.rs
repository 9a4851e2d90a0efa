//! # Solana Session Keys
//!
//! ed25519 keys addressed by their base58 public key. The persisted record
//! holds the 64-byte `seed || public key` form used by Solana wallets; a
//! record whose public half does not match its seed is rejected.

use serde::{Deserialize, Serialize};
use shared_crypto::encoding::{from_base58, to_base58};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey};
use shared_types::{canonical_json, ActionPayload, ChainBase, SessionPayload};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::SignerError;
use crate::domain::session_key::SessionKey;

/// Persisted Solana key: `{"privateKey": "<base58 of seed || pubkey>"}`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SolanaKeyRecord {
    /// base58 of the 64-byte key pair.
    pub private_key: String,
}

impl fmt::Debug for SolanaKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SolanaKeyRecord(***)")
    }
}

/// A Solana session key.
#[derive(Debug)]
pub struct SolanaKey {
    keypair: Ed25519KeyPair,
    address: String,
}

impl SolanaKey {
    fn from_keypair(keypair: Ed25519KeyPair) -> Self {
        let address = to_base58(keypair.public_key().as_bytes());
        Self { keypair, address }
    }
}

/// Verify a base58 ed25519 signature by the base58 address `signer`.
pub fn verify_base58(signer: &str, message: &[u8], signature: &str) -> Result<(), SignerError> {
    let public_key = from_base58(signer)
        .and_then(|bytes| Ed25519PublicKey::from_slice(&bytes))
        .map_err(|e| SignerError::MalformedSignature(format!("bad signer address: {e}")))?;
    let signature =
        from_base58(signature).map_err(|e| SignerError::MalformedSignature(e.to_string()))?;

    public_key
        .verify(message, &signature)
        .map_err(|_| SignerError::SignatureVerificationFailed)
}

impl SessionKey for SolanaKey {
    const FAMILY: ChainBase = ChainBase::Solana;
    type Record = SolanaKeyRecord;

    fn generate(_chain_id: &str) -> Result<Self, SignerError> {
        Ok(Self::from_keypair(Ed25519KeyPair::generate()))
    }

    fn from_record(_chain_id: &str, record: Self::Record) -> Result<Self, SignerError> {
        let bytes = from_base58(&record.private_key)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        let keypair = Ed25519KeyPair::from_keypair_bytes(&bytes)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        Ok(Self::from_keypair(keypair))
    }

    fn to_record(&self) -> Self::Record {
        SolanaKeyRecord {
            private_key: to_base58(&self.keypair.to_keypair_bytes()),
        }
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn sign_action(&self, payload: &ActionPayload) -> Result<String, SignerError> {
        let message = canonical_json(payload)?;
        Ok(to_base58(&self.keypair.sign(message.as_bytes())))
    }

    fn verify_action(
        address: &str,
        payload: &ActionPayload,
        signature: &str,
    ) -> Result<(), SignerError> {
        let message = canonical_json(payload)?;
        verify_base58(address, message.as_bytes(), signature)
    }

    fn verify_authorization(payload: &SessionPayload, signature: &str) -> Result<(), SignerError> {
        let message = canonical_json(payload)?;
        verify_base58(&payload.from, message.as_bytes(), signature)
            .map_err(|e| SignerError::InvalidWalletSignature(e.to_string()))
    }
}
