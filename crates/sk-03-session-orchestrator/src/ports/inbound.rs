//! # Inbound Ports (Driving Ports / API)
//!
//! What the application calls. Per-action convenience methods
//! (`sign_thread`, `sign_comment`, ...) live on `SessionOrchestrator` and
//! all funnel into `sign_action`.

use async_trait::async_trait;
use shared_types::{ChainBase, SessionPayload, SignedAction};

use crate::domain::actions::DomainAction;
use crate::domain::errors::SessionError;

/// Session management and action signing.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Session key address of `(base, chain_id)`, creating the key if needed.
    ///
    /// `from_address` is the wallet the session will be issued for.
    async fn get_or_create_address(
        &self,
        base: ChainBase,
        chain_id: &str,
        from_address: &str,
    ) -> Result<String, SessionError>;

    /// Hand a wallet-signed session payload to the scope's signer.
    async fn auth_session(
        &self,
        base: ChainBase,
        chain_id: &str,
        from_address: &str,
        payload: SessionPayload,
        signature: String,
    ) -> Result<(), SessionError>;

    /// Drop the authorization of `(base, chain_id)`; the session key stays.
    async fn logout(&self, base: ChainBase, chain_id: &str) -> Result<(), SessionError>;

    /// Sign `action` on the active chain as `address`, asking the wallet
    /// for an authorization first if the scope has none.
    ///
    /// # Errors
    ///
    /// - `LoginCancelled` if the user cancels the wallet prompt.
    /// - `AddressMismatch` if the wallet signs as another address.
    /// - `AuthorizationTimedOut` if a configured timeout elapses.
    async fn sign_action(
        &self,
        address: &str,
        action: DomainAction,
    ) -> Result<SignedAction, SessionError>;
}
