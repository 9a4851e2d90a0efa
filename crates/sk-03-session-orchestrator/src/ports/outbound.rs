//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the orchestrator depends on: the user's wallet, which signs
//! session payloads, and the ambient chain context, which says which chain
//! the application is currently on.

use async_trait::async_trait;
use shared_types::{ChainBase, SessionPayload};
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// WALLET
// =============================================================================

/// Error from the wallet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The user dismissed the signing request.
    #[error("User cancelled the signing request")]
    Cancelled,

    /// The wallet refused to sign.
    #[error("Wallet rejected the request: {0}")]
    Rejected(String),

    /// The wallet cannot sign for this family.
    #[error("Wallet does not support {0}")]
    UnsupportedChain(ChainBase),

    /// Communication with the wallet failed.
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),
}

/// A session payload awaiting the wallet's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    /// Family of the session key.
    pub base: ChainBase,
    /// Chain id of the scope.
    pub chain_id: String,
    /// Wallet address the caller expects to sign.
    pub address: String,
    /// Payload minted by the orchestrator, `from` set to `address`.
    pub payload: SessionPayload,
}

/// What the wallet returns: the payload it actually signed and its signature.
///
/// A wallet bound to another account signs with that account, so
/// `payload.from` may differ from the request's `address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedSession {
    /// The signed payload.
    pub payload: SessionPayload,
    /// Wallet signature in the family's wallet encoding.
    pub signature: String,
}

/// The user's wallet.
///
/// `sign_session` may wait on the user indefinitely; the orchestrator owns
/// cancellation and timeouts.
#[async_trait]
pub trait WalletCollaborator: Send + Sync {
    /// Sign a session payload the way the family's wallets do.
    async fn sign_session(&self, request: &SessionRequest) -> Result<SignedSession, WalletError>;

    /// Recent blockhash to anchor a new session, if the wallet can provide one.
    async fn recent_block(
        &self,
        _base: ChainBase,
        _chain_id: &str,
    ) -> Result<Option<String>, WalletError> {
        Ok(None)
    }
}

#[async_trait]
impl<W: WalletCollaborator + ?Sized> WalletCollaborator for Arc<W> {
    async fn sign_session(&self, request: &SessionRequest) -> Result<SignedSession, WalletError> {
        (**self).sign_session(request).await
    }

    async fn recent_block(
        &self,
        base: ChainBase,
        chain_id: &str,
    ) -> Result<Option<String>, WalletError> {
        (**self).recent_block(base, chain_id).await
    }
}

// =============================================================================
// CHAIN CONTEXT
// =============================================================================

/// The chain the application is currently on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveChain {
    /// Chain family.
    pub base: ChainBase,
    /// Chain identifier (EVM chain id, network name, ...).
    pub id: String,
    /// Address prefix of Cosmos SDK chains.
    pub bech32_prefix: Option<String>,
}

impl ActiveChain {
    /// Create a chain context entry without a bech32 prefix.
    pub fn new(base: ChainBase, id: impl Into<String>) -> Self {
        Self {
            base,
            id: id.into(),
            bech32_prefix: None,
        }
    }

    /// Create a Cosmos SDK chain entry.
    pub fn cosmos(id: impl Into<String>, bech32_prefix: impl Into<String>) -> Self {
        Self {
            base: ChainBase::CosmosSdk,
            id: id.into(),
            bech32_prefix: Some(bech32_prefix.into()),
        }
    }

    /// Chain id of the session scope: the bech32 prefix on Cosmos SDK
    /// chains, the chain id everywhere else.
    pub fn scope_chain_id(&self) -> &str {
        match (self.base, self.bech32_prefix.as_deref()) {
            (ChainBase::CosmosSdk, Some(prefix)) => prefix,
            _ => &self.id,
        }
    }
}

/// Source of the ambient active chain.
pub trait ChainContext: Send + Sync {
    /// The active chain, or `None` if the application is on no chain.
    fn active_chain(&self) -> Option<ActiveChain>;
}

impl<C: ChainContext + ?Sized> ChainContext for Arc<C> {
    fn active_chain(&self) -> Option<ActiveChain> {
        (**self).active_chain()
    }
}
