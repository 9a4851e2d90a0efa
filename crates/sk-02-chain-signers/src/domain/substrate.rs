//! # Substrate Session Keys
//!
//! ed25519 keys derived from a 12-word BIP-39 mnemonic. The address is the
//! `0x`-prefixed hex public key, independent of any SS58 network prefix.
//! Actions are signed over their canonical JSON bytes.

use serde::{Deserialize, Serialize};
use shared_crypto::encoding::{from_hex, to_hex_prefixed};
use shared_crypto::{Ed25519KeyPair, Ed25519PublicKey, Mnemonic};
use shared_types::{canonical_json, ActionPayload, ChainBase};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::SignerError;
use crate::domain::session_key::SessionKey;

/// Persisted Substrate key: `{"mnemonic": "<12 words>"}`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SubstrateKeyRecord {
    /// English BIP-39 phrase.
    pub mnemonic: String,
}

impl fmt::Debug for SubstrateKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubstrateKeyRecord(***)")
    }
}

/// A Substrate session key.
#[derive(Debug)]
pub struct SubstrateKey {
    mnemonic: Mnemonic,
    keypair: Ed25519KeyPair,
    address: String,
}

impl SubstrateKey {
    fn from_mnemonic(mnemonic: Mnemonic) -> Self {
        let keypair = mnemonic.ed25519_keypair();
        let address = to_hex_prefixed(keypair.public_key().as_bytes());
        Self {
            mnemonic,
            keypair,
            address,
        }
    }
}

impl SessionKey for SubstrateKey {
    const FAMILY: ChainBase = ChainBase::Substrate;
    type Record = SubstrateKeyRecord;

    fn generate(_chain_id: &str) -> Result<Self, SignerError> {
        Ok(Self::from_mnemonic(Mnemonic::generate()))
    }

    fn from_record(_chain_id: &str, record: Self::Record) -> Result<Self, SignerError> {
        let mnemonic = Mnemonic::from_phrase(&record.mnemonic)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        Ok(Self::from_mnemonic(mnemonic))
    }

    fn to_record(&self) -> Self::Record {
        SubstrateKeyRecord {
            mnemonic: self.mnemonic.phrase().to_string(),
        }
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn sign_action(&self, payload: &ActionPayload) -> Result<String, SignerError> {
        let message = canonical_json(payload)?;
        Ok(to_hex_prefixed(&self.keypair.sign(message.as_bytes())))
    }

    fn verify_action(
        address: &str,
        payload: &ActionPayload,
        signature: &str,
    ) -> Result<(), SignerError> {
        let public_key = from_hex(address).and_then(|bytes| Ed25519PublicKey::from_slice(&bytes))?;
        let signature =
            from_hex(signature).map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
        let message = canonical_json(payload)?;

        public_key
            .verify(message.as_bytes(), &signature)
            .map_err(|_| SignerError::SignatureVerificationFailed)
    }

    fn same_address(a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    fn payload() -> ActionPayload {
        ActionPayload {
            app: "commonwealth".to_string(),
            block: None,
            call: "comment".to_string(),
            call_args: Default::default(),
            chain: "polkadot:edgeware".to_string(),
            from: "0xwallet".to_string(),
            timestamp: 42,
        }
    }

    #[test]
    fn test_mnemonic_record_is_deterministic() {
        let record = SubstrateKeyRecord {
            mnemonic: PHRASE.to_string(),
        };
        let a = SubstrateKey::from_record("edgeware", record.clone()).unwrap();
        let b = SubstrateKey::from_record("edgeware", record).unwrap();

        assert_eq!(a.address(), b.address());
        assert_eq!(a.address().len(), 2 + 64);
        assert_eq!(a.to_record().mnemonic, PHRASE);
    }

    #[test]
    fn test_bad_mnemonic_rejected() {
        let record = SubstrateKeyRecord {
            mnemonic: "not a real phrase".to_string(),
        };
        assert!(matches!(
            SubstrateKey::from_record("edgeware", record),
            Err(SignerError::InvalidKeyRecord(_))
        ));
    }

    #[test]
    fn test_sign_and_verify_action() {
        let key = SubstrateKey::generate("edgeware").unwrap();
        let signature = key.sign_action(&payload()).unwrap();
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.len(), 2 + 128);

        SubstrateKey::verify_action(key.address(), &payload(), &signature).unwrap();

        let mut changed = payload();
        changed.call = "thread".to_string();
        assert_eq!(
            SubstrateKey::verify_action(key.address(), &changed, &signature),
            Err(SignerError::SignatureVerificationFailed)
        );
    }
}
