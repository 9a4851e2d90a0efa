//! # Cosmos SDK Session Keys
//!
//! secp256k1 keys with bech32 account addresses; the chain id *is* the
//! bech32 prefix (`cosmos`, `osmo`, `juno`, ...).
//!
//! Arbitrary data is signed the ADR-036 way: it is wrapped in an amino
//! `StdSignDoc` with a single `sign/MsgSignData` message, empty fee, zero
//! account number and sequence, and an empty chain id. The document is
//! serialized as sorted JSON with `&`, `<`, `>` escaped, hashed with SHA-256
//! and signed with low-S ECDSA. The result travels as a `StdSignature`:
//!
//! ```json
//! {"pub_key":{"type":"tendermint/PubKeySecp256k1","value":"<b64>"},"signature":"<b64 r||s>"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_crypto::encoding::{bech32_decode, from_base64, from_hex, to_base64};
use shared_crypto::{sha256, Secp256k1KeyPair, Secp256k1PublicKey};
use shared_types::{canonical_json, ActionPayload, ChainBase, SessionPayload};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::errors::SignerError;
use crate::domain::session_key::SessionKey;

/// Amino type of a secp256k1 public key.
pub const PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";
/// Amino type of the ADR-036 message.
pub const MSG_SIGN_DATA: &str = "sign/MsgSignData";

/// Persisted Cosmos key: `{"privkey": "<hex>"}`.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CosmosKeyRecord {
    /// Unprefixed hex of the 32-byte secret.
    pub privkey: String,
}

impl fmt::Debug for CosmosKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CosmosKeyRecord(***)")
    }
}

/// Amino-encoded public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AminoPubKey {
    /// Always [`PUBKEY_TYPE`].
    #[serde(rename = "type")]
    pub kind: String,
    /// base64 compressed SEC1 point.
    pub value: String,
}

/// Signature plus the public key needed to check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    /// Signer's public key.
    pub pub_key: AminoPubKey,
    /// base64 `r || s`.
    pub signature: String,
}

/// A Cosmos SDK session key.
#[derive(Debug)]
pub struct CosmosKey {
    keypair: Secp256k1KeyPair,
    address: String,
}

impl CosmosKey {
    fn from_keypair(chain_id: &str, keypair: Secp256k1KeyPair) -> Result<Self, SignerError> {
        let address = keypair.public_key().cosmos_address(chain_id)?;
        Ok(Self { keypair, address })
    }
}

/// ADR-036 sign bytes for `data` signed by `signer`.
pub fn adr036_sign_bytes(signer: &str, data: &[u8]) -> Result<Vec<u8>, SignerError> {
    let doc = json!({
        "chain_id": "",
        "account_number": "0",
        "sequence": "0",
        "fee": { "gas": "0", "amount": [] },
        "msgs": [{
            "type": MSG_SIGN_DATA,
            "value": { "signer": signer, "data": to_base64(data) },
        }],
        "memo": "",
    });
    Ok(escape_amino(&canonical_json(&doc)?).into_bytes())
}

fn escape_amino(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

/// Sign `data` ADR-036 style, returning the `StdSignature` JSON string.
pub fn sign_adr036(
    keypair: &Secp256k1KeyPair,
    signer: &str,
    data: &[u8],
) -> Result<String, SignerError> {
    let hash = sha256(&adr036_sign_bytes(signer, data)?);
    let signature = keypair.sign_prehash(&hash)?;
    let std_signature = StdSignature {
        pub_key: AminoPubKey {
            kind: PUBKEY_TYPE.to_string(),
            value: to_base64(keypair.public_key().as_bytes()),
        },
        signature: to_base64(signature.rs()),
    };
    Ok(canonical_json(&std_signature)?)
}

/// Verify an ADR-036 `StdSignature` over `data` by the bech32 `signer`.
///
/// The embedded public key must derive `signer` under the signer's own
/// prefix; otherwise any key could vouch for any address.
pub fn verify_adr036(signer: &str, data: &[u8], signature: &str) -> Result<(), SignerError> {
    let std_signature: StdSignature = serde_json::from_str(signature)
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
    if std_signature.pub_key.kind != PUBKEY_TYPE {
        return Err(SignerError::MalformedSignature(format!(
            "unsupported public key type {}",
            std_signature.pub_key.kind
        )));
    }

    let public_key = from_base64(&std_signature.pub_key.value)
        .and_then(|bytes| Secp256k1PublicKey::from_sec1_bytes(&bytes))
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;
    let rs = from_base64(&std_signature.signature)
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;

    let (prefix, _) = bech32_decode(signer)?;
    if public_key.cosmos_address(&prefix)? != signer {
        return Err(SignerError::SignatureVerificationFailed);
    }

    let hash = sha256(&adr036_sign_bytes(signer, data)?);
    public_key
        .verify_prehash(&hash, &rs)
        .map_err(|_| SignerError::SignatureVerificationFailed)
}

impl SessionKey for CosmosKey {
    const FAMILY: ChainBase = ChainBase::CosmosSdk;
    type Record = CosmosKeyRecord;

    fn generate(chain_id: &str) -> Result<Self, SignerError> {
        Self::from_keypair(chain_id, Secp256k1KeyPair::generate())
    }

    fn from_record(chain_id: &str, record: Self::Record) -> Result<Self, SignerError> {
        let bytes =
            from_hex(&record.privkey).map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        let keypair = Secp256k1KeyPair::from_slice(&bytes)
            .map_err(|e| SignerError::InvalidKeyRecord(e.to_string()))?;
        Self::from_keypair(chain_id, keypair)
    }

    fn to_record(&self) -> Self::Record {
        CosmosKeyRecord {
            privkey: hex::encode(self.keypair.to_bytes()),
        }
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn sign_action(&self, payload: &ActionPayload) -> Result<String, SignerError> {
        let data = canonical_json(payload)?;
        sign_adr036(&self.keypair, &self.address, data.as_bytes())
    }

    fn verify_action(
        address: &str,
        payload: &ActionPayload,
        signature: &str,
    ) -> Result<(), SignerError> {
        let data = canonical_json(payload)?;
        verify_adr036(address, data.as_bytes(), signature)
    }

    fn verify_authorization(payload: &SessionPayload, signature: &str) -> Result<(), SignerError> {
        let data = canonical_json(payload)?;
        verify_adr036(&payload.from, data.as_bytes(), signature)
            .map_err(|e| SignerError::InvalidWalletSignature(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(from: &str) -> SessionPayload {
        SessionPayload {
            app: "commonwealth".to_string(),
            block: Some("ABCD".to_string()),
            chain: "cosmos:osmo".to_string(),
            from: from.to_string(),
            session_address: "osmo1session".to_string(),
            session_duration: 1_000,
            session_issued: 1,
        }
    }

    #[test]
    fn test_address_uses_chain_id_as_prefix() {
        let key = CosmosKey::generate("osmo").unwrap();
        assert!(key.address().starts_with("osmo1"));

        let restored = CosmosKey::from_record("osmo", key.to_record()).unwrap();
        assert_eq!(restored.address(), key.address());
        assert!(!key.to_record().privkey.starts_with("0x"));
    }

    #[test]
    fn test_sign_doc_shape() {
        let bytes = adr036_sign_bytes("cosmos1abc", b"hi").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            r#"{"account_number":"0","chain_id":"","fee":{"amount":[],"gas":"0"},"memo":"","msgs":[{"type":"sign/MsgSignData","value":{"data":"aGk=","signer":"cosmos1abc"}}],"sequence":"0"}"#
        );
    }

    #[test]
    fn test_amino_escaping() {
        assert_eq!(
            escape_amino(r#"{"a":"<&>"}"#),
            r#"{"a":"\u003c\u0026\u003e"}"#
        );
    }

    #[test]
    fn test_action_signature_roundtrip() {
        let key = CosmosKey::generate("juno").unwrap();
        let action = ActionPayload {
            app: "commonwealth".to_string(),
            block: None,
            call: "thread".to_string(),
            call_args: Default::default(),
            chain: "cosmos:juno".to_string(),
            from: "juno1wallet".to_string(),
            timestamp: 5,
        };
        let signature = key.sign_action(&action).unwrap();
        let parsed: StdSignature = serde_json::from_str(&signature).unwrap();
        assert_eq!(parsed.pub_key.kind, PUBKEY_TYPE);

        CosmosKey::verify_action(key.address(), &action, &signature).unwrap();

        let other = CosmosKey::generate("juno").unwrap();
        assert_eq!(
            CosmosKey::verify_action(other.address(), &action, &signature),
            Err(SignerError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn test_wallet_authorization_verified_against_from() {
        let wallet = Secp256k1KeyPair::generate();
        let from = wallet.public_key().cosmos_address("osmo").unwrap();
        let session = payload(&from);
        let data = canonical_json(&session).unwrap();
        let signature = sign_adr036(&wallet, &from, data.as_bytes()).unwrap();

        CosmosKey::verify_authorization(&session, &signature).unwrap();

        // Valid signature, but by a key that does not own `from`.
        let impostor = Secp256k1KeyPair::generate();
        let forged = sign_adr036(&impostor, &from, data.as_bytes()).unwrap();
        assert!(matches!(
            CosmosKey::verify_authorization(&session, &forged),
            Err(SignerError::InvalidWalletSignature(_))
        ));

        assert!(matches!(
            CosmosKey::verify_authorization(&session, "not json"),
            Err(SignerError::InvalidWalletSignature(_))
        ));
    }
}
