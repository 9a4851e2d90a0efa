//! # Core Domain Entities
//!
//! Wire-level entities of the session delegation protocol.
//!
//! ## Clusters
//!
//! - **Chains**: `ChainBase`, `SessionScope`
//! - **Payloads**: `SessionPayload` (signed by the wallet), `ActionPayload`
//!   (signed by the session key)
//! - **Envelopes**: `Session`, `Action`, `SignedAction`

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canonical::{action_hash, canonical_json};
use crate::errors::TypesError;

/// Arguments of an application call, keyed by argument name.
///
/// A `BTreeMap` keeps argument order stable before canonicalization.
pub type CallArgs = BTreeMap<String, serde_json::Value>;

// =============================================================================
// CLUSTER A: CHAINS
// =============================================================================

/// A class of blockchains sharing one signature scheme and address format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChainBase {
    /// All EVM chains.
    #[serde(rename = "ethereum")]
    Ethereum,
    /// Substrate / Polkadot chains.
    #[serde(rename = "substrate")]
    Substrate,
    /// Cosmos SDK chains, distinguished by bech32 prefix.
    #[serde(rename = "cosmos")]
    CosmosSdk,
    /// Solana clusters.
    #[serde(rename = "solana")]
    Solana,
    /// NEAR networks.
    #[serde(rename = "near")]
    Near,
}

impl ChainBase {
    /// Every supported family, in dispatch order.
    pub const ALL: [ChainBase; 5] = [
        ChainBase::Ethereum,
        ChainBase::Substrate,
        ChainBase::CosmosSdk,
        ChainBase::Solana,
        ChainBase::Near,
    ];

    /// Family name used in persistence keys (`SESSION-<family>-<chainId>`).
    pub fn family_name(&self) -> &'static str {
        match self {
            ChainBase::Ethereum => "ethereum",
            ChainBase::Substrate => "substrate",
            ChainBase::CosmosSdk => "cosmos",
            ChainBase::Solana => "solana",
            ChainBase::Near => "near",
        }
    }

    /// Namespace of the `chain` field carried by payloads.
    pub fn chain_namespace(&self) -> &'static str {
        match self {
            ChainBase::Ethereum => "eip155",
            ChainBase::Substrate => "polkadot",
            ChainBase::CosmosSdk => "cosmos",
            ChainBase::Solana => "solana",
            ChainBase::Near => "near",
        }
    }

    /// Fully qualified chain string, e.g. `eip155:1` or `cosmos:osmo`.
    pub fn qualified_chain(&self, chain_id: &str) -> String {
        format!("{}:{}", self.chain_namespace(), chain_id)
    }

    /// Split a qualified chain string back into family and chain id.
    pub fn parse_qualified_chain(chain: &str) -> Result<(ChainBase, &str), TypesError> {
        let (namespace, chain_id) = chain
            .split_once(':')
            .ok_or_else(|| TypesError::InvalidChain(chain.to_string()))?;
        let base = ChainBase::ALL
            .into_iter()
            .find(|base| base.chain_namespace() == namespace)
            .ok_or_else(|| TypesError::InvalidChain(chain.to_string()))?;
        Ok((base, chain_id))
    }
}

impl fmt::Display for ChainBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.family_name())
    }
}

impl FromStr for ChainBase {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "eth" | "evm" => Ok(ChainBase::Ethereum),
            "substrate" | "polkadot" => Ok(ChainBase::Substrate),
            "cosmos" | "cosmossdk" => Ok(ChainBase::CosmosSdk),
            "solana" => Ok(ChainBase::Solana),
            "near" => Ok(ChainBase::Near),
            _ => Err(TypesError::UnknownChainBase(s.to_string())),
        }
    }
}

/// The unit of session ownership: one live session key per scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionScope {
    /// Chain family.
    pub base: ChainBase,
    /// Chain identifier within the family (EVM chain id, bech32 prefix, ...).
    pub chain_id: String,
}

/// Suffix marking the authorization slot in persisted record keys.
pub const AUTH_SUFFIX: &str = "-auth";

impl SessionScope {
    /// Create a new scope.
    pub fn new(base: ChainBase, chain_id: impl Into<String>) -> Self {
        Self {
            base,
            chain_id: chain_id.into(),
        }
    }

    /// Check that `chain_id` can own a scope. Empty ids and ids ending in
    /// `-auth` are refused: the latter would share a record key with the
    /// authorization slot of another scope.
    pub fn validate_chain_id(chain_id: &str) -> Result<(), TypesError> {
        if chain_id.is_empty() || chain_id.ends_with(AUTH_SUFFIX) {
            return Err(TypesError::InvalidChainId(chain_id.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for SessionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base.family_name(), self.chain_id)
    }
}

// =============================================================================
// CLUSTER B: PAYLOADS
// =============================================================================

/// The message a wallet signs to delegate authority to a session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    /// Application identifier.
    pub app: String,
    /// Reference blockhash observed when the session was issued.
    pub block: Option<String>,
    /// Qualified chain string (`<namespace>:<chainId>`).
    pub chain: String,
    /// The delegating wallet address.
    pub from: String,
    /// The delegated session key address.
    pub session_address: String,
    /// Intended session lifetime in milliseconds.
    pub session_duration: u64,
    /// Issue time in milliseconds since the Unix epoch.
    pub session_issued: u64,
}

impl SessionPayload {
    /// Time at which the session was meant to lapse (ms since epoch).
    pub fn expires_at(&self) -> u64 {
        self.session_issued.saturating_add(self.session_duration)
    }

    /// Whether `now_ms` lies past the intended lifetime.
    ///
    /// Informational only: signers do not refuse expired sessions.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at()
    }
}

/// A domain action signed by the session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    /// Application identifier, copied from the session.
    pub app: String,
    /// Reference blockhash, copied from the session.
    pub block: Option<String>,
    /// Call name, e.g. `thread` or `reactComment`.
    pub call: String,
    /// Call arguments.
    pub call_args: CallArgs,
    /// Qualified chain string, copied from the session.
    pub chain: String,
    /// The delegating wallet address.
    pub from: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

// =============================================================================
// CLUSTER C: ENVELOPES
// =============================================================================

/// Discriminator carried in the `type` field of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    /// A wallet-signed session.
    Session,
    /// A session-signed action.
    Action,
}

/// A wallet-issued session authorization on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Always `EnvelopeKind::Session`.
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// The signed payload.
    pub payload: SessionPayload,
    /// Wallet signature, in the family's wallet signature encoding.
    pub signature: String,
}

impl Session {
    /// Wrap a payload and its wallet signature.
    pub fn new(payload: SessionPayload, signature: impl Into<String>) -> Self {
        Self {
            kind: EnvelopeKind::Session,
            payload,
            signature: signature.into(),
        }
    }
}

/// A session-signed action on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Always `EnvelopeKind::Action`.
    #[serde(rename = "type")]
    pub kind: EnvelopeKind,
    /// The signed payload.
    pub payload: ActionPayload,
    /// The delegating wallet address (equals `payload.from`).
    pub session: String,
    /// Session key signature over the payload.
    pub signature: String,
}

impl Action {
    /// Wrap a payload, the delegator address and the session signature.
    pub fn new(
        payload: ActionPayload,
        session: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            kind: EnvelopeKind::Action,
            payload,
            session: session.into(),
            signature: signature.into(),
        }
    }

    /// Deterministic content hash of this action.
    pub fn hash(&self) -> Result<String, TypesError> {
        action_hash(self)
    }
}

/// The unit returned to a caller after signing: three JSON strings ready to
/// be posted to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAction {
    /// Canonical JSON of the `Session` envelope.
    pub session: String,
    /// Canonical JSON of the `Action` envelope.
    pub action: String,
    /// `action_hash` of the action.
    pub hash: String,
}

impl SignedAction {
    /// Serialize both envelopes and hash the action.
    pub fn new(session: &Session, action: &Action) -> Result<Self, TypesError> {
        Ok(Self {
            session: canonical_json(session)?,
            action: canonical_json(action)?,
            hash: action_hash(action)?,
        })
    }

    /// Parse the session envelope back.
    pub fn decode_session(&self) -> Result<Session, TypesError> {
        Ok(serde_json::from_str(&self.session)?)
    }

    /// Parse the action envelope back.
    pub fn decode_action(&self) -> Result<Action, TypesError> {
        Ok(serde_json::from_str(&self.action)?)
    }
}
