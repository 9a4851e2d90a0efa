//! # Session Container
//!
//! Owns the session store, the chain context and the orchestrator for the
//! lifetime of the application.

pub mod config;

pub use config::{ConfigError, RuntimeConfig};

use shared_crypto::SecretKey;
use sk_01_session_store::{
    EncryptedSessionStore, FileSessionStore, InMemorySessionStore, SessionStore, StoreError,
};
use sk_03_session_orchestrator::{
    ActiveChain, SessionOrchestrator, SignerRegistry, StaticChainContext, WalletCollaborator,
};
use std::sync::Arc;
use tracing::info;

/// Orchestrator as wired by the container.
pub type Orchestrator<W> = SessionOrchestrator<W, Arc<StaticChainContext>>;

/// Application-lifetime owner of the session subsystems.
pub struct SessionContainer<W: WalletCollaborator> {
    store: Arc<dyn SessionStore>,
    chain_context: Arc<StaticChainContext>,
    orchestrator: Arc<Orchestrator<W>>,
}

impl<W: WalletCollaborator> SessionContainer<W> {
    /// Wire every subsystem from `config`, signing sessions with `wallet`.
    pub fn build(config: &RuntimeConfig, wallet: W) -> Result<Self, StoreError> {
        let store = open_store(config)?;
        let chain_context = Arc::new(StaticChainContext::default());
        let orchestrator = Arc::new(SessionOrchestrator::new(
            SignerRegistry::new(store.clone()),
            wallet,
            chain_context.clone(),
            config.orchestrator.clone(),
        ));

        info!(
            app_id = %config.orchestrator.app_id,
            persistent = config.store_path.is_some(),
            encrypted = config.store_key.is_some(),
            "Session container ready"
        );

        Ok(Self {
            store,
            chain_context,
            orchestrator,
        })
    }

    /// The orchestrator.
    pub fn orchestrator(&self) -> Arc<Orchestrator<W>> {
        Arc::clone(&self.orchestrator)
    }

    /// The session store shared by every signer.
    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    /// Switch the active chain.
    pub fn set_active_chain(&self, chain: ActiveChain) {
        info!(family = chain.base.family_name(), chain_id = %chain.id, "Active chain changed");
        self.chain_context.set_active(chain);
    }
}

fn open_store(config: &RuntimeConfig) -> Result<Arc<dyn SessionStore>, StoreError> {
    let key = config.store_key.map(SecretKey::from_bytes);
    let store: Arc<dyn SessionStore> = match (&config.store_path, key) {
        (Some(path), Some(key)) => {
            Arc::new(EncryptedSessionStore::new(FileSessionStore::open(path)?, key))
        }
        (Some(path), None) => Arc::new(FileSessionStore::open(path)?),
        (None, Some(key)) => Arc::new(EncryptedSessionStore::new(InMemorySessionStore::new(), key)),
        (None, None) => Arc::new(InMemorySessionStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ChainBase;
    use sk_03_session_orchestrator::{LocalWallet, SessionApi};

    #[tokio::test]
    async fn test_sessions_survive_container_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig::default()
            .with_store_path(dir.path().join("sessions.json"))
            .with_store_key([7u8; 32]);
        let wallet = LocalWallet::generate();
        let address = wallet.address(ChainBase::Solana, "mainnet").unwrap();

        let first = SessionContainer::build(&config, wallet.clone()).unwrap();
        first.set_active_chain(ActiveChain::new(ChainBase::Solana, "mainnet"));
        first
            .orchestrator()
            .sign_thread_reaction(&address, 1, true)
            .await
            .unwrap();
        let session_address = first
            .orchestrator()
            .get_or_create_address(ChainBase::Solana, "mainnet", &address)
            .await
            .unwrap();
        drop(first);

        let second = SessionContainer::build(&config, wallet).unwrap();
        let orchestrator = second.orchestrator();
        let signer = orchestrator.get_session_controller(ChainBase::Solana);
        assert!(signer.has_authenticated_session("mainnet").await.unwrap());
        assert_eq!(
            signer.get_or_create_address("mainnet").await.unwrap(),
            session_address
        );
    }

    #[tokio::test]
    async fn test_wrong_store_key_regenerates_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let wallet = LocalWallet::generate();

        let first = SessionContainer::build(
            &RuntimeConfig::default().with_store_path(&path).with_store_key([1u8; 32]),
            wallet.clone(),
        )
        .unwrap();
        let old = first
            .orchestrator()
            .get_or_create_address(ChainBase::Near, "mainnet", "wallet")
            .await
            .unwrap();
        drop(first);

        let second = SessionContainer::build(
            &RuntimeConfig::default().with_store_path(&path).with_store_key([2u8; 32]),
            wallet,
        )
        .unwrap();
        let fresh = second
            .orchestrator()
            .get_or_create_address(ChainBase::Near, "mainnet", "wallet")
            .await
            .unwrap();
        assert_ne!(old, fresh);
    }
}
