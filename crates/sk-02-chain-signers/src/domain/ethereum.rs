//! # Ethereum Session Keys
//!
//! secp256k1 keys with EIP-55 addresses. Actions are signed as EIP-712
//! typed data so that any EVM wallet tooling can display and verify them:
//!
//! ```text
//! EIP712Domain(string name)                      name = payload.app
//! Action(string app,string block,string call,string callArgs,
//!        string chain,string from,uint256 timestamp)
//! ```
//!
//! `callArgs` is the canonical JSON of the argument map and a missing
//! `block` is encoded as the empty string.

use serde::{Deserialize, Serialize};
use shared_crypto::encoding::{from_hex, to_hex_prefixed};
use shared_crypto::{keccak256, RecoverableSignature, Secp256k1KeyPair};
use shared_types::{canonical_json, ActionPayload, ChainBase, SessionPayload};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::SignerError;
use crate::domain::session_key::SessionKey;

const DOMAIN_TYPE: &str = "EIP712Domain(string name)";
const ACTION_TYPE: &str =
    "Action(string app,string block,string call,string callArgs,string chain,string from,uint256 timestamp)";
const SESSION_TYPE: &str = "Session(string app,string block,string chain,string from,string sessionAddress,uint256 sessionDuration,uint256 sessionIssued)";

/// Persisted Ethereum key: `{"privateKey": "0x<hex>"}`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct EthereumKeyRecord {
    /// `0x`-prefixed 32-byte secret.
    pub private_key: String,
}

impl fmt::Debug for EthereumKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EthereumKeyRecord(***)")
    }
}

/// An Ethereum session key.
#[derive(Debug)]
pub struct EthereumKey {
    keypair: Secp256k1KeyPair,
    address: String,
}

impl EthereumKey {
    fn from_keypair(keypair: Secp256k1KeyPair) -> Result<Self, SignerError> {
        let address = keypair.public_key().eth_address()?;
        Ok(Self { keypair, address })
    }
}

impl SessionKey for EthereumKey {
    const FAMILY: ChainBase = ChainBase::Ethereum;
    type Record = EthereumKeyRecord;

    fn generate(_chain_id: &str) -> Result<Self, SignerError> {
        Self::from_keypair(Secp256k1KeyPair::generate())
    }

    fn from_record(_chain_id: &str, record: Self::Record) -> Result<Self, SignerError> {
        let bytes = from_hex(&record.private_key)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        let keypair = Secp256k1KeyPair::from_slice(&bytes)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        Self::from_keypair(keypair)
    }

    fn to_record(&self) -> Self::Record {
        EthereumKeyRecord {
            private_key: to_hex_prefixed(&self.keypair.to_bytes()),
        }
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn sign_action(&self, payload: &ActionPayload) -> Result<String, SignerError> {
        let digest = action_digest(payload)?;
        let signature = self.keypair.sign_prehash(&digest)?;
        Ok(to_hex_prefixed(&signature.to_eth_bytes()))
    }

    fn verify_action(
        address: &str,
        payload: &ActionPayload,
        signature: &str,
    ) -> Result<(), SignerError> {
        let digest = action_digest(payload)?;
        let signer = recover_signer(&digest, signature)?;
        if Self::same_address(&signer, address) {
            Ok(())
        } else {
            Err(SignerError::SignatureVerificationFailed)
        }
    }

    fn same_address(a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }
}

/// Recover the EIP-55 address that produced a `0x` r‖s‖v signature.
pub fn recover_signer(digest: &[u8; 32], signature: &str) -> Result<String, SignerError> {
    let bytes = from_hex(signature).map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
    let signature = RecoverableSignature::from_eth_bytes(&bytes)
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
    let public_key = signature
        .recover(digest)
        .map_err(|_| SignerError::SignatureVerificationFailed)?;
    Ok(public_key.eth_address()?)
}

/// EIP-712 digest of an action payload.
pub fn action_digest(payload: &ActionPayload) -> Result<[u8; 32], SignerError> {
    let call_args = canonical_json(&payload.call_args)?;
    let mut encoded = Vec::with_capacity(32 * 8);
    encoded.extend_from_slice(&keccak256(ACTION_TYPE.as_bytes()));
    encoded.extend_from_slice(&hash_string(&payload.app));
    encoded.extend_from_slice(&hash_string(payload.block.as_deref().unwrap_or("")));
    encoded.extend_from_slice(&hash_string(&payload.call));
    encoded.extend_from_slice(&hash_string(&call_args));
    encoded.extend_from_slice(&hash_string(&payload.chain));
    encoded.extend_from_slice(&hash_string(&payload.from));
    encoded.extend_from_slice(&uint256(payload.timestamp));

    Ok(typed_data_digest(&payload.app, &keccak256(&encoded)))
}

/// EIP-712 digest of a session payload, as signed by an EVM wallet.
pub fn session_digest(payload: &SessionPayload) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(32 * 8);
    encoded.extend_from_slice(&keccak256(SESSION_TYPE.as_bytes()));
    encoded.extend_from_slice(&hash_string(&payload.app));
    encoded.extend_from_slice(&hash_string(payload.block.as_deref().unwrap_or("")));
    encoded.extend_from_slice(&hash_string(&payload.chain));
    encoded.extend_from_slice(&hash_string(&payload.from));
    encoded.extend_from_slice(&hash_string(&payload.session_address));
    encoded.extend_from_slice(&uint256(payload.session_duration));
    encoded.extend_from_slice(&uint256(payload.session_issued));

    typed_data_digest(&payload.app, &keccak256(&encoded))
}

fn typed_data_digest(app: &str, struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut domain = Vec::with_capacity(64);
    domain.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
    domain.extend_from_slice(&hash_string(app));
    let domain_separator = keccak256(&domain);

    let mut message = Vec::with_capacity(66);
    message.extend_from_slice(&[0x19, 0x01]);
    message.extend_from_slice(&domain_separator);
    message.extend_from_slice(struct_hash);
    keccak256(&message)
}

fn hash_string(value: &str) -> [u8; 32] {
    keccak256(value.as_bytes())
}

fn uint256(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::CallArgs;

    fn payload() -> ActionPayload {
        let mut args = CallArgs::new();
        args.insert("thread_id".to_string(), json!(7));
        ActionPayload {
            app: "commonwealth".to_string(),
            block: Some("0xblock".to_string()),
            call: "reactThread".to_string(),
            call_args: args,
            chain: "eip155:1".to_string(),
            from: "0xWallet".to_string(),
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_address_is_checksummed_hex() {
        let record = EthereumKeyRecord {
            private_key: format!("0x{}01", "00".repeat(31)),
        };
        let key = EthereumKey::from_record("1", record).unwrap();
        assert_eq!(key.address(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn test_record_roundtrip_keeps_address() {
        let key = EthereumKey::generate("1").unwrap();
        let record = key.to_record();
        assert!(record.private_key.starts_with("0x"));

        let restored = EthereumKey::from_record("1", record).unwrap();
        assert_eq!(restored.address(), key.address());
    }

    #[test]
    fn test_record_rejects_garbage() {
        let record = EthereumKeyRecord {
            private_key: "0x1234".to_string(),
        };
        assert!(matches!(
            EthereumKey::from_record("1", record),
            Err(SignerError::InvalidKeyRecord(_))
        ));
    }

    #[test]
    fn test_sign_and_verify_action() {
        let key = EthereumKey::generate("1").unwrap();
        let signature = key.sign_action(&payload()).unwrap();

        assert_eq!(signature.len(), 2 + 130);
        let v = &signature[signature.len() - 2..];
        assert!(v == "1b" || v == "1c");
        EthereumKey::verify_action(key.address(), &payload(), &signature).unwrap();
        EthereumKey::verify_action(&key.address().to_lowercase(), &payload(), &signature)
            .unwrap();
    }

    #[test]
    fn test_verify_rejects_other_payload_and_signer() {
        let key = EthereumKey::generate("1").unwrap();
        let other = EthereumKey::generate("1").unwrap();
        let signature = key.sign_action(&payload()).unwrap();

        let mut changed = payload();
        changed.timestamp += 1;
        assert_eq!(
            EthereumKey::verify_action(key.address(), &changed, &signature),
            Err(SignerError::SignatureVerificationFailed)
        );
        assert_eq!(
            EthereumKey::verify_action(other.address(), &payload(), &signature),
            Err(SignerError::SignatureVerificationFailed)
        );
        assert!(matches!(
            EthereumKey::verify_action(key.address(), &payload(), "0xnothex"),
            Err(SignerError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_digest_depends_on_domain_name() {
        let mut other_app = payload();
        other_app.app = "other".to_string();
        assert_ne!(action_digest(&payload()).unwrap(), action_digest(&other_app).unwrap());
    }

    #[test]
    fn test_missing_block_hashes_as_empty_string() {
        let mut none = payload();
        none.block = None;
        let mut empty = payload();
        empty.block = Some(String::new());
        assert_eq!(action_digest(&none).unwrap(), action_digest(&empty).unwrap());
    }

    #[test]
    fn test_session_digest_recovers_wallet() {
        let wallet = Secp256k1KeyPair::generate();
        let address = wallet.public_key().eth_address().unwrap();
        let session = SessionPayload {
            app: "commonwealth".to_string(),
            block: None,
            chain: "eip155:1".to_string(),
            from: address.clone(),
            session_address: "0xSession".to_string(),
            session_duration: 86_400_000,
            session_issued: 1,
        };
        let digest = session_digest(&session);
        let signature = to_hex_prefixed(&wallet.sign_prehash(&digest).unwrap().to_eth_bytes());

        assert_eq!(recover_signer(&digest, &signature).unwrap(), address);
    }

    #[test]
    fn test_uint256_is_big_endian() {
        let word = uint256(0x0102);
        assert_eq!(word[30], 0x01);
        assert_eq!(word[31], 0x02);
        assert!(word[..30].iter().all(|b| *b == 0));
    }
}
