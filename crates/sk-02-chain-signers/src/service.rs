//! # Chain Signer Service
//!
//! Application service that implements `SessionSigner` for any
//! `SessionKey` family.
//!
//! ## Architecture
//!
//! - Owns the in-process state of every scope of its family: the loaded
//!   session key and, if any, the cached wallet authorization
//! - Uses the `SessionStore` port for persist-on-create,
//!   persist-on-authorize and restore-on-load
//! - Delegates key material, signing and verification to the domain layer
//!
//! ## Restore-on-load
//!
//! The first access to a chain id reads both slots. An unreadable key slot
//! is a RestoreFailure: it is logged, the auth slot is discarded and a fresh
//! key is generated and persisted. A readable key keeps its authorization
//! only if the authorization names the key's address.

use async_trait::async_trait;
use parking_lot::RwLock;
use session_telemetry::{
    metric_inc, ACTIONS_SIGNED, AUTHORIZATIONS, RESTORE_FAILURES, SESSION_KEYS_CREATED,
    SIGNING_DURATION,
};
use shared_types::{
    Action, ActionPayload, CallArgs, ChainBase, Session, SessionPayload, SessionScope,
    SignedAction,
};
use sk_01_session_store::{SessionStore, StoreKey};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::domain::errors::SignerError;
use crate::domain::session_key::{SessionAuthorization, SessionKey};
use crate::ports::inbound::SessionSigner;

/// In-process state of one scope.
struct ScopeState<K> {
    key: Arc<K>,
    auth: Option<SessionAuthorization>,
}

/// Outcome of reading a key slot.
enum StoredKey<K> {
    Missing,
    Unreadable(String),
    Loaded(K),
}

/// Session signer for the family of `K`.
pub struct ChainSigner<K: SessionKey> {
    store: Arc<dyn SessionStore>,
    scopes: RwLock<HashMap<String, ScopeState<K>>>,
}

impl<K: SessionKey> ChainSigner<K> {
    /// Create a signer persisting into `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            scopes: RwLock::new(HashMap::new()),
        }
    }

    fn family_name() -> &'static str {
        K::FAMILY.family_name()
    }

    fn scope(chain_id: &str) -> SessionScope {
        SessionScope::new(K::FAMILY, chain_id)
    }

    /// Key and cached authorization of `chain_id`, restoring or creating
    /// the scope on first access.
    fn load(&self, chain_id: &str) -> Result<(Arc<K>, Option<SessionAuthorization>), SignerError> {
        if let Some(state) = self.scopes.read().get(chain_id) {
            return Ok((state.key.clone(), state.auth.clone()));
        }

        SessionScope::validate_chain_id(chain_id)?;

        let mut scopes = self.scopes.write();
        // Another caller may have restored the scope while we waited.
        if let Some(state) = scopes.get(chain_id) {
            return Ok((state.key.clone(), state.auth.clone()));
        }

        let state = self.restore(chain_id)?;
        let loaded = (state.key.clone(), state.auth.clone());
        scopes.insert(chain_id.to_string(), state);
        Ok(loaded)
    }

    fn restore(&self, chain_id: &str) -> Result<ScopeState<K>, SignerError> {
        let scope = Self::scope(chain_id);

        match self.read_key(&scope) {
            StoredKey::Loaded(key) => {
                let auth = self.read_auth(&scope, key.address());
                debug!(
                    family = Self::family_name(),
                    chain_id,
                    session_address = key.address(),
                    authenticated = auth.is_some(),
                    "Session key restored"
                );
                Ok(ScopeState {
                    key: Arc::new(key),
                    auth,
                })
            }
            StoredKey::Missing => {
                debug!(family = Self::family_name(), chain_id, "No stored session key");
                self.create(&scope)
            }
            StoredKey::Unreadable(reason) => {
                warn!(
                    family = Self::family_name(),
                    chain_id,
                    %reason,
                    "Stored session key unusable, generating a new one"
                );
                metric_inc!(RESTORE_FAILURES, &[Self::family_name(), "key"]);
                self.discard_auth(&scope);
                self.create(&scope)
            }
        }
    }

    fn read_key(&self, scope: &SessionScope) -> StoredKey<K> {
        let text = match self.store.get(&StoreKey::key(scope)) {
            Ok(Some(text)) => text,
            Ok(None) => return StoredKey::Missing,
            Err(e) => return StoredKey::Unreadable(e.to_string()),
        };

        let record = match serde_json::from_str::<K::Record>(&text) {
            Ok(record) => record,
            Err(e) => return StoredKey::Unreadable(e.to_string()),
        };

        match K::from_record(&scope.chain_id, record) {
            Ok(key) => StoredKey::Loaded(key),
            Err(e) => StoredKey::Unreadable(e.to_string()),
        }
    }

    fn read_auth(&self, scope: &SessionScope, address: &str) -> Option<SessionAuthorization> {
        let text = match self.store.get(&StoreKey::auth(scope)) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!(family = Self::family_name(), chain_id = %scope.chain_id, error = %e, "Stored authorization unreadable");
                metric_inc!(RESTORE_FAILURES, &[Self::family_name(), "auth"]);
                self.discard_auth(scope);
                return None;
            }
        };

        let auth = match serde_json::from_str::<SessionAuthorization>(&text) {
            Ok(auth) => auth,
            Err(e) => {
                warn!(family = Self::family_name(), chain_id = %scope.chain_id, error = %e, "Stored authorization malformed");
                metric_inc!(RESTORE_FAILURES, &[Self::family_name(), "auth"]);
                self.discard_auth(scope);
                return None;
            }
        };

        if !K::same_address(&auth.payload.session_address, address) {
            info!(
                family = Self::family_name(),
                chain_id = %scope.chain_id,
                session_address = address,
                authorized = %auth.payload.session_address,
                "Stored authorization names another session key, logging out"
            );
            self.discard_auth(scope);
            return None;
        }

        Some(auth)
    }

    /// Remove a persisted authorization during restore. Failures are logged
    /// only: restore never fails on cleanup.
    fn discard_auth(&self, scope: &SessionScope) {
        if let Err(e) = self.store.delete(&StoreKey::auth(scope)) {
            warn!(family = Self::family_name(), chain_id = %scope.chain_id, error = %e, "Could not discard stored authorization");
        }
    }

    fn create(&self, scope: &SessionScope) -> Result<ScopeState<K>, SignerError> {
        let key = K::generate(&scope.chain_id)?;
        let record = serde_json::to_string(&key.to_record())?;
        self.store.put(&StoreKey::key(scope), &record)?;

        metric_inc!(SESSION_KEYS_CREATED, &[Self::family_name()]);
        info!(
            family = Self::family_name(),
            chain_id = %scope.chain_id,
            session_address = key.address(),
            "Session key created"
        );

        Ok(ScopeState {
            key: Arc::new(key),
            auth: None,
        })
    }

    fn reject(&self, chain_id: &str, error: SignerError) -> SignerError {
        metric_inc!(AUTHORIZATIONS, &[Self::family_name(), "rejected"]);
        warn!(family = Self::family_name(), chain_id, %error, "Authorization rejected");
        error
    }
}

#[async_trait]
impl<K: SessionKey> SessionSigner for ChainSigner<K> {
    fn family(&self) -> ChainBase {
        K::FAMILY
    }

    async fn get_address(&self, chain_id: &str) -> Option<String> {
        self.scopes
            .read()
            .get(chain_id)
            .map(|state| state.key.address().to_string())
    }

    async fn has_authenticated_session(&self, chain_id: &str) -> Result<bool, SignerError> {
        let (_, auth) = self.load(chain_id)?;
        Ok(auth.is_some())
    }

    async fn get_or_create_address(&self, chain_id: &str) -> Result<String, SignerError> {
        let (key, _) = self.load(chain_id)?;
        Ok(key.address().to_string())
    }

    async fn auth_session(
        &self,
        chain_id: &str,
        payload: SessionPayload,
        signature: String,
    ) -> Result<(), SignerError> {
        let (key, _) = self.load(chain_id)?;

        if !K::same_address(&payload.session_address, key.address()) {
            return Err(self.reject(
                chain_id,
                SignerError::InvalidAuthorization {
                    expected: key.address().to_string(),
                    actual: payload.session_address,
                },
            ));
        }

        if let Err(e) = K::verify_authorization(&payload, &signature) {
            return Err(self.reject(chain_id, e));
        }

        let auth = SessionAuthorization { payload, signature };
        let scope = Self::scope(chain_id);
        self.store
            .put(&StoreKey::auth(&scope), &serde_json::to_string(&auth)?)?;

        info!(
            family = Self::family_name(),
            chain_id,
            session_address = key.address(),
            wallet = %auth.payload.from,
            "Session authorized"
        );
        metric_inc!(AUTHORIZATIONS, &[Self::family_name(), "accepted"]);

        if let Some(state) = self.scopes.write().get_mut(chain_id) {
            state.auth = Some(auth);
        }
        Ok(())
    }

    async fn sign(
        &self,
        chain_id: &str,
        call: &str,
        args: CallArgs,
    ) -> Result<SignedAction, SignerError> {
        let (key, auth) = self.load(chain_id)?;
        let auth = auth.ok_or_else(|| SignerError::NoActiveSession {
            chain_id: chain_id.to_string(),
        })?;

        let timer = SIGNING_DURATION
            .with_label_values(&[Self::family_name()])
            .start_timer();

        let payload = ActionPayload {
            app: auth.payload.app.clone(),
            block: auth.payload.block.clone(),
            call: call.to_string(),
            call_args: args,
            chain: auth.payload.chain.clone(),
            from: auth.payload.from.clone(),
            timestamp: now_ms(),
        };

        let signature = key.sign_action(&payload)?;
        if let Err(e) = K::verify_action(key.address(), &payload, &signature) {
            warn!(family = Self::family_name(), chain_id, call, error = %e, "Fresh signature failed self-verification");
            return Err(SignerError::SignatureVerificationFailed);
        }

        let action = Action::new(payload, auth.payload.from.clone(), signature);
        let session = Session::new(auth.payload, auth.signature);
        let signed = SignedAction::new(&session, &action)?;

        timer.observe_duration();
        metric_inc!(ACTIONS_SIGNED, &[Self::family_name(), call]);
        debug!(
            family = Self::family_name(),
            chain_id,
            call,
            session_address = key.address(),
            hash = %signed.hash,
            "Action signed"
        );

        Ok(signed)
    }

    async fn clear_session(&self, chain_id: &str) -> Result<(), SignerError> {
        SessionScope::validate_chain_id(chain_id)?;
        let scope = Self::scope(chain_id);
        self.store.delete(&StoreKey::auth(&scope))?;
        if let Some(state) = self.scopes.write().get_mut(chain_id) {
            state.auth = None;
        }
        info!(family = Self::family_name(), chain_id, "Session cleared");
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
