//! # Cross-Family Scenarios
//!
//! Every chain family through the orchestrator, a file-backed store shared
//! across restarts, and the verifier rejecting envelopes that do not belong
//! together.

#[cfg(test)]
mod tests {
    use shared_types::{ChainBase, SessionScope};
    use sk_01_session_store::{FileSessionStore, SessionStore, StoreKey};
    use sk_02_chain_signers::{verify_signed_action, SignerError};
    use sk_03_session_orchestrator::{
        ActiveChain, LocalWallet, OrchestratorConfig, SessionApi, SessionOrchestrator,
        SignerRegistry, StaticChainContext,
    };
    use std::path::Path;
    use std::sync::Arc;

    fn chains() -> Vec<ActiveChain> {
        vec![
            ActiveChain::new(ChainBase::Ethereum, "137"),
            ActiveChain::new(ChainBase::Substrate, "edgeware"),
            ActiveChain::cosmos("juno-1", "juno"),
            ActiveChain::new(ChainBase::Solana, "mainnet-beta"),
            ActiveChain::new(ChainBase::Near, "testnet"),
        ]
    }

    fn orchestrator(
        path: &Path,
        wallet: LocalWallet,
        chain: ActiveChain,
    ) -> SessionOrchestrator<LocalWallet, StaticChainContext> {
        let store = Arc::new(FileSessionStore::open(path).unwrap());
        SessionOrchestrator::new(
            SignerRegistry::new(store),
            wallet,
            StaticChainContext::new(chain),
            OrchestratorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_sessions_persist_across_restart_for_every_family() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let wallet = LocalWallet::generate();

        let mut session_addresses = Vec::new();
        for chain in chains() {
            let address = wallet.address(chain.base, chain.scope_chain_id()).unwrap();
            let sessions = orchestrator(&path, wallet.clone(), chain.clone());
            sessions.sign_comment(&address, 1, "first", None).await.unwrap();
            let session_address = sessions
                .get_or_create_address(chain.base, chain.scope_chain_id(), &address)
                .await
                .unwrap();
            session_addresses.push(session_address);
        }

        for (chain, expected) in chains().into_iter().zip(session_addresses) {
            let sessions = orchestrator(&path, wallet.clone(), chain.clone());
            let signer = sessions.get_session_controller(chain.base);
            let chain_id = chain.scope_chain_id();

            assert!(signer.has_authenticated_session(chain_id).await.unwrap());
            assert_eq!(signer.get_or_create_address(chain_id).await.unwrap(), expected);

            let signed = signer
                .sign(chain_id, "deleteComment", Default::default())
                .await
                .unwrap();
            let session = signed.decode_session().unwrap();
            assert_eq!(session.payload.session_address, expected);
            verify_signed_action(&session, &signed.decode_action().unwrap()).unwrap();
        }
    }

    #[tokio::test]
    async fn test_failed_key_write_is_not_handed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let blocker = path.with_extension("tmp");
        let chain = ActiveChain::new(ChainBase::Ethereum, "1");

        let sessions = orchestrator(&path, LocalWallet::generate(), chain);
        let signer = sessions.get_session_controller(ChainBase::Ethereum);

        std::fs::create_dir(&blocker).unwrap();
        assert!(signer.get_or_create_address("1").await.is_err());
        std::fs::remove_dir(&blocker).unwrap();

        let address = signer.get_or_create_address("1").await.unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        let restarted = SignerRegistry::new(Arc::new(store));
        assert_eq!(
            restarted
                .get(ChainBase::Ethereum)
                .get_or_create_address("1")
                .await
                .unwrap(),
            address
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_slot_regenerates_key_and_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let wallet = LocalWallet::generate();
        let chain = ActiveChain::new(ChainBase::Near, "mainnet");
        let address = wallet.address(ChainBase::Near, "mainnet").unwrap();

        let old = {
            let sessions = orchestrator(&path, wallet.clone(), chain.clone());
            sessions.sign_thread_reaction(&address, 3, false).await.unwrap();
            sessions
                .get_or_create_address(ChainBase::Near, "mainnet", &address)
                .await
                .unwrap()
        };

        let scope = SessionScope::new(ChainBase::Near, "mainnet");
        {
            let store = FileSessionStore::open(&path).unwrap();
            store
                .put(&StoreKey::key(&scope), r#"{"privateKey":"ed25519:not-base58!"}"#)
                .unwrap();
        }

        let sessions = orchestrator(&path, wallet, chain);
        let signer = sessions.get_session_controller(ChainBase::Near);
        let fresh = signer.get_or_create_address("mainnet").await.unwrap();
        assert_ne!(fresh, old);
        assert!(!signer.has_authenticated_session("mainnet").await.unwrap());

        let store = FileSessionStore::open(&path).unwrap();
        assert_eq!(store.get(&StoreKey::auth(&scope)).unwrap(), None);
    }

    #[tokio::test]
    async fn test_verifier_rejects_mixed_envelopes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        let wallet = LocalWallet::generate();

        let solana = ActiveChain::new(ChainBase::Solana, "devnet");
        let cosmos = ActiveChain::cosmos("osmosis-1", "osmo");

        let solana_signed = orchestrator(&path, wallet.clone(), solana)
            .sign_delete_thread(&wallet.address(ChainBase::Solana, "devnet").unwrap(), 1)
            .await
            .unwrap();
        let cosmos_signed = orchestrator(&path, wallet.clone(), cosmos)
            .sign_delete_thread(&wallet.address(ChainBase::CosmosSdk, "osmo").unwrap(), 1)
            .await
            .unwrap();

        let solana_session = solana_signed.decode_session().unwrap();
        let cosmos_action = cosmos_signed.decode_action().unwrap();
        assert!(matches!(
            verify_signed_action(&solana_session, &cosmos_action),
            Err(SignerError::EnvelopeMismatch(_))
        ));

        // A forged wallet signature on a Cosmos session is caught too.
        let mut cosmos_session = cosmos_signed.decode_session().unwrap();
        cosmos_session.signature = solana_session.signature.clone();
        assert!(matches!(
            verify_signed_action(&cosmos_session, &cosmos_action),
            Err(SignerError::InvalidWalletSignature(_))
        ));
    }
}
