//! # Inbound Ports (Driving Ports / API)
//!
//! The capability every chain-family signer exposes. The orchestrator only
//! ever talks to signers through this trait.

use async_trait::async_trait;
use shared_types::{CallArgs, ChainBase, SessionPayload, SignedAction};

use crate::domain::errors::SignerError;

/// Session-key signer for one chain family.
///
/// All methods are scoped by `chain_id`; scopes never share keys.
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait SessionSigner: Send + Sync {
    /// Family served by this signer.
    fn family(&self) -> ChainBase;

    /// Address of the session key already loaded for `chain_id`, if any.
    ///
    /// Never loads or creates a key.
    async fn get_address(&self, chain_id: &str) -> Option<String>;

    /// Load (or create) the key for `chain_id` and report whether a matching
    /// authorization is cached.
    async fn has_authenticated_session(&self, chain_id: &str) -> Result<bool, SignerError>;

    /// Load (or create) the key for `chain_id` and return its address.
    async fn get_or_create_address(&self, chain_id: &str) -> Result<String, SignerError>;

    /// Accept a wallet authorization for the session key of `chain_id`.
    ///
    /// # Errors
    ///
    /// - `InvalidAuthorization` if `payload.session_address` is not this
    ///   scope's session address. Nothing is cached or persisted.
    /// - `InvalidWalletSignature` if the family can verify the wallet
    ///   signature and it does not verify.
    async fn auth_session(
        &self,
        chain_id: &str,
        payload: SessionPayload,
        signature: String,
    ) -> Result<(), SignerError>;

    /// Sign an application call with the session key.
    ///
    /// # Errors
    ///
    /// - `NoActiveSession` if no authorization is cached for `chain_id`.
    /// - `SignatureVerificationFailed` if the fresh signature does not verify.
    async fn sign(
        &self,
        chain_id: &str,
        call: &str,
        args: CallArgs,
    ) -> Result<SignedAction, SignerError>;

    /// Drop the cached authorization of `chain_id` and its persisted slot.
    ///
    /// The session key itself is kept.
    async fn clear_session(&self, chain_id: &str) -> Result<(), SignerError>;
}
