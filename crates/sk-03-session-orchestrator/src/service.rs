//! # Session Orchestrator Service
//!
//! Implements `SessionApi` over a `SignerRegistry`, a `WalletCollaborator`
//! and a `ChainContext`.
//!
//! ## Single flight
//!
//! Orchestration is serialized per `(ChainBase, chainId)`: two concurrent
//! `sign_action` calls on a scope without a session produce one wallet
//! prompt. The second caller waits for the first and then finds the scope
//! authenticated.
//!
//! ## Cancellation
//!
//! `cancel_login` aborts every wallet prompt in flight with
//! `LoginCancelled`. Prompts started afterwards are unaffected.

use async_trait::async_trait;
use parking_lot::Mutex;
use session_telemetry::{metric_inc, WALLET_PROMPTS};
use shared_types::{ChainBase, SessionPayload, SessionScope, SignedAction};
use sk_02_chain_signers::{same_address, SessionSigner, SignerError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, info, warn};

use crate::domain::actions::DomainAction;
use crate::domain::config::OrchestratorConfig;
use crate::domain::errors::SessionError;
use crate::ports::inbound::SessionApi;
use crate::ports::outbound::{
    ActiveChain, ChainContext, SessionRequest, SignedSession, WalletCollaborator,
};
use crate::registry::SignerRegistry;

/// The session orchestrator.
pub struct SessionOrchestrator<W: WalletCollaborator, C: ChainContext> {
    registry: SignerRegistry,
    wallet: W,
    chain: C,
    config: OrchestratorConfig,
    /// One async lock per scope ever orchestrated.
    scope_locks: Mutex<HashMap<SessionScope, Arc<AsyncMutex<()>>>>,
    /// Bumped by `cancel_login`; prompts watch for changes.
    cancel_tx: watch::Sender<u64>,
}

impl<W: WalletCollaborator, C: ChainContext> SessionOrchestrator<W, C> {
    /// Create an orchestrator.
    pub fn new(registry: SignerRegistry, wallet: W, chain: C, config: OrchestratorConfig) -> Self {
        let (cancel_tx, _) = watch::channel(0);
        Self {
            registry,
            wallet,
            chain,
            config,
            scope_locks: Mutex::new(HashMap::new()),
            cancel_tx,
        }
    }

    /// Signer serving `base`.
    pub fn get_session_controller(&self, base: ChainBase) -> &dyn SessionSigner {
        self.registry.get(base)
    }

    /// Configuration in use.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Abort every wallet prompt currently awaiting the user.
    pub fn cancel_login(&self) {
        self.cancel_tx.send_modify(|generation| *generation += 1);
        info!("Login cancelled");
    }

    /// The payload a wallet signs to delegate to `session_address`.
    pub fn new_session_payload(
        &self,
        base: ChainBase,
        chain_id: &str,
        from: &str,
        session_address: &str,
        issued_ms: u64,
        block: Option<String>,
    ) -> SessionPayload {
        SessionPayload {
            app: self.config.app_id.clone(),
            block,
            chain: base.qualified_chain(chain_id),
            from: from.to_string(),
            session_address: session_address.to_string(),
            session_duration: self.config.session_duration_ms,
            session_issued: issued_ms,
        }
    }

    // =========================================================================
    // DOMAIN ACTIONS
    // =========================================================================

    /// Sign a new thread.
    pub async fn sign_thread(
        &self,
        address: &str,
        community: &str,
        title: &str,
        body: &str,
        link: &str,
        topic: Option<u64>,
    ) -> Result<SignedAction, SessionError> {
        let action = DomainAction::Thread {
            community: community.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            link: link.to_string(),
            topic,
        };
        self.sign_action(address, action).await
    }

    /// Sign a thread deletion.
    pub async fn sign_delete_thread(
        &self,
        address: &str,
        thread_id: u64,
    ) -> Result<SignedAction, SessionError> {
        self.sign_action(address, DomainAction::DeleteThread { thread_id })
            .await
    }

    /// Sign a comment, optionally replying to `parent_comment_id`.
    pub async fn sign_comment(
        &self,
        address: &str,
        thread_id: u64,
        body: &str,
        parent_comment_id: Option<u64>,
    ) -> Result<SignedAction, SessionError> {
        let action = DomainAction::Comment {
            thread_id,
            body: body.to_string(),
            parent_comment_id,
        };
        self.sign_action(address, action).await
    }

    /// Sign a comment deletion.
    pub async fn sign_delete_comment(
        &self,
        address: &str,
        comment_id: u64,
    ) -> Result<SignedAction, SessionError> {
        self.sign_action(address, DomainAction::DeleteComment { comment_id })
            .await
    }

    /// Sign a thread reaction.
    pub async fn sign_thread_reaction(
        &self,
        address: &str,
        thread_id: u64,
        like: bool,
    ) -> Result<SignedAction, SessionError> {
        self.sign_action(address, DomainAction::ThreadReaction { thread_id, like })
            .await
    }

    /// Sign the removal of a thread reaction.
    pub async fn sign_delete_thread_reaction(
        &self,
        address: &str,
        thread_id: u64,
    ) -> Result<SignedAction, SessionError> {
        self.sign_action(address, DomainAction::DeleteThreadReaction { thread_id })
            .await
    }

    /// Sign a comment reaction.
    pub async fn sign_comment_reaction(
        &self,
        address: &str,
        comment_id: u64,
        like: bool,
    ) -> Result<SignedAction, SessionError> {
        self.sign_action(address, DomainAction::CommentReaction { comment_id, like })
            .await
    }

    /// Sign the removal of a comment reaction.
    pub async fn sign_delete_comment_reaction(
        &self,
        address: &str,
        comment_id: u64,
    ) -> Result<SignedAction, SessionError> {
        self.sign_action(address, DomainAction::DeleteCommentReaction { comment_id })
            .await
    }

    // =========================================================================
    // ORCHESTRATION
    // =========================================================================

    fn scope_lock(&self, scope: SessionScope) -> Arc<AsyncMutex<()>> {
        self.scope_locks.lock().entry(scope).or_default().clone()
    }

    /// Obtain and install a wallet authorization for `address` on `chain`.
    async fn authorize(
        &self,
        signer: &dyn SessionSigner,
        chain: &ActiveChain,
        chain_id: &str,
        address: &str,
    ) -> Result<(), SessionError> {
        let base = chain.base;
        let session_address = signer.get_or_create_address(chain_id).await?;
        let block = self.wallet.recent_block(base, chain_id).await?;
        let request = SessionRequest {
            base,
            chain_id: chain_id.to_string(),
            address: address.to_string(),
            payload: self.new_session_payload(
                base,
                chain_id,
                address,
                &session_address,
                now_ms(),
                block,
            ),
        };

        info!(
            family = base.family_name(),
            chain_id,
            session_address = %session_address,
            wallet = address,
            "Requesting session authorization from wallet"
        );
        let signed = self.prompt_wallet(base, &request).await?;

        if !same_address(base, &signed.payload.from, address) {
            metric_inc!(WALLET_PROMPTS, &[base.family_name(), "mismatch"]);
            warn!(
                family = base.family_name(),
                chain_id,
                expected = address,
                actual = %signed.payload.from,
                "Wallet signed as a different address"
            );
            return Err(SessionError::AddressMismatch {
                expected: address.to_string(),
                actual: signed.payload.from,
            });
        }

        signer
            .auth_session(chain_id, signed.payload, signed.signature)
            .await?;
        metric_inc!(WALLET_PROMPTS, &[base.family_name(), "signed"]);
        Ok(())
    }

    /// Wait for the wallet, honouring cancellation and the optional timeout.
    async fn prompt_wallet(
        &self,
        base: ChainBase,
        request: &SessionRequest,
    ) -> Result<SignedSession, SessionError> {
        let mut cancelled = self.cancel_tx.subscribe();
        let prompt = async {
            tokio::select! {
                result = self.wallet.sign_session(request) => result.map_err(SessionError::from),
                _ = cancelled.changed() => Err(SessionError::LoginCancelled),
            }
        };

        let result = match self.config.auth_timeout {
            Some(limit) => tokio::time::timeout(limit, prompt)
                .await
                .unwrap_or(Err(SessionError::AuthorizationTimedOut)),
            None => prompt.await,
        };

        if let Err(e) = &result {
            let outcome = match e {
                SessionError::LoginCancelled => "cancelled",
                SessionError::AuthorizationTimedOut => "timed_out",
                _ => "failed",
            };
            metric_inc!(WALLET_PROMPTS, &[base.family_name(), outcome]);
            info!(family = base.family_name(), chain_id = %request.chain_id, error = %e, "Wallet authorization did not complete");
        }
        result
    }
}

#[async_trait]
impl<W: WalletCollaborator, C: ChainContext> SessionApi for SessionOrchestrator<W, C> {
    async fn get_or_create_address(
        &self,
        base: ChainBase,
        chain_id: &str,
        from_address: &str,
    ) -> Result<String, SessionError> {
        debug!(family = base.family_name(), chain_id, wallet = from_address, "Session address requested");
        Ok(self.registry.get(base).get_or_create_address(chain_id).await?)
    }

    async fn auth_session(
        &self,
        base: ChainBase,
        chain_id: &str,
        from_address: &str,
        payload: SessionPayload,
        signature: String,
    ) -> Result<(), SessionError> {
        debug!(family = base.family_name(), chain_id, wallet = from_address, "Session authorization submitted");
        Ok(self
            .registry
            .get(base)
            .auth_session(chain_id, payload, signature)
            .await?)
    }

    async fn logout(&self, base: ChainBase, chain_id: &str) -> Result<(), SessionError> {
        Ok(self.registry.get(base).clear_session(chain_id).await?)
    }

    async fn sign_action(
        &self,
        address: &str,
        action: DomainAction,
    ) -> Result<SignedAction, SessionError> {
        let chain = self
            .chain
            .active_chain()
            .ok_or(SessionError::NoActiveChain)?;
        let chain_id = chain.scope_chain_id().to_string();
        let signer = self.registry.get(chain.base);

        let lock = self.scope_lock(SessionScope::new(chain.base, chain_id.clone()));
        let _guard = lock.lock().await;

        if !signer.has_authenticated_session(&chain_id).await? {
            self.authorize(signer, &chain, &chain_id, address).await?;
            if !signer.has_authenticated_session(&chain_id).await? {
                return Err(SignerError::NoActiveSession { chain_id }.into());
            }
        }

        Ok(signer
            .sign(&chain_id, action.call(), action.call_args())
            .await?)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
