//! # Local Wallet
//!
//! A `WalletCollaborator` backed by in-process keys, for development and
//! end-to-end tests. It signs session payloads exactly as the family's real
//! wallets do, so the signers cannot tell it apart from one:
//!
//! | Family | Wallet key | Session signature |
//! |--------|-----------|-------------------|
//! | Ethereum | secp256k1 | EIP-712 `Session` typed data, `0x` r‖s‖v |
//! | Cosmos SDK | secp256k1 | ADR-036 `StdSignature` JSON |
//! | Substrate | ed25519 | ed25519 over canonical JSON, `0x` hex |
//! | Solana | ed25519 | ed25519 over canonical JSON, base58 |
//! | NEAR | ed25519 | ed25519 over canonical JSON, base64 |
//!
//! Like a browser wallet bound to one account, it always signs as its own
//! address, whatever address the request expected.

use async_trait::async_trait;
use shared_crypto::encoding::{to_base58, to_base64, to_hex_prefixed};
use shared_crypto::{Ed25519KeyPair, Secp256k1KeyPair};
use shared_types::{canonical_json, ChainBase, SessionPayload};
use sk_02_chain_signers::domain::{cosmos, ethereum, near};
use tracing::debug;

use crate::ports::outbound::{SessionRequest, SignedSession, WalletCollaborator, WalletError};

/// In-process wallet holding one secp256k1 and one ed25519 account.
#[derive(Debug, Clone)]
pub struct LocalWallet {
    secp256k1: Secp256k1KeyPair,
    ed25519: Ed25519KeyPair,
}

impl LocalWallet {
    /// Wallet with fresh random accounts.
    pub fn generate() -> Self {
        Self::from_keys(Secp256k1KeyPair::generate(), Ed25519KeyPair::generate())
    }

    /// Wallet over existing accounts.
    pub fn from_keys(secp256k1: Secp256k1KeyPair, ed25519: Ed25519KeyPair) -> Self {
        Self { secp256k1, ed25519 }
    }

    /// Wallet address on `(base, chain_id)`.
    pub fn address(&self, base: ChainBase, chain_id: &str) -> Result<String, WalletError> {
        let ed_public = self.ed25519.public_key();
        let address = match base {
            ChainBase::Ethereum => self.secp256k1.public_key().eth_address().map_err(rejected)?,
            ChainBase::CosmosSdk => self
                .secp256k1
                .public_key()
                .cosmos_address(chain_id)
                .map_err(rejected)?,
            ChainBase::Substrate => to_hex_prefixed(ed_public.as_bytes()),
            ChainBase::Solana => to_base58(ed_public.as_bytes()),
            ChainBase::Near => format!("{}{}", near::KEY_PREFIX, to_base58(ed_public.as_bytes())),
        };
        Ok(address)
    }

    /// Sign `payload` with the account of `base`.
    pub fn sign_payload(
        &self,
        base: ChainBase,
        payload: &SessionPayload,
    ) -> Result<String, WalletError> {
        let signature = match base {
            ChainBase::Ethereum => {
                let digest = ethereum::session_digest(payload);
                let signature = self.secp256k1.sign_prehash(&digest).map_err(rejected)?;
                to_hex_prefixed(&signature.to_eth_bytes())
            }
            ChainBase::CosmosSdk => {
                let data = canonical_json(payload).map_err(rejected)?;
                cosmos::sign_adr036(&self.secp256k1, &payload.from, data.as_bytes())
                    .map_err(rejected)?
            }
            ChainBase::Substrate | ChainBase::Solana | ChainBase::Near => {
                let message = canonical_json(payload).map_err(rejected)?;
                let signature = self.ed25519.sign(message.as_bytes());
                match base {
                    ChainBase::Substrate => to_hex_prefixed(&signature),
                    ChainBase::Solana => to_base58(&signature),
                    _ => to_base64(&signature),
                }
            }
        };
        Ok(signature)
    }
}

#[async_trait]
impl WalletCollaborator for LocalWallet {
    async fn sign_session(&self, request: &SessionRequest) -> Result<SignedSession, WalletError> {
        let mut payload = request.payload.clone();
        payload.from = self.address(request.base, &request.chain_id)?;

        let signature = self.sign_payload(request.base, &payload)?;
        debug!(
            family = request.base.family_name(),
            chain_id = %request.chain_id,
            wallet = %payload.from,
            "Local wallet signed session"
        );
        Ok(SignedSession { payload, signature })
    }
}

fn rejected(err: impl std::fmt::Display) -> WalletError {
    WalletError::Rejected(err.to_string())
}
