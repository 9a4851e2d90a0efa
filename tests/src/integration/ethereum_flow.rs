//! # Ethereum End-to-End Flow
//!
//! Fresh storage, a wallet authorizing the session key through EIP-712, a
//! thread signed by the session key, and the backend-side checks on the
//! result.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared_crypto::encoding::to_hex_prefixed;
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{CallArgs, ChainBase, SessionPayload, SessionScope};
    use sk_01_session_store::{InMemorySessionStore, SessionStore, StoreKey};
    use sk_02_chain_signers::domain::ethereum::{recover_signer, session_digest};
    use sk_02_chain_signers::{verify_signed_action, EthereumSigner, SessionSigner};
    use sk_03_session_orchestrator::{
        ActiveChain, LocalWallet, OrchestratorConfig, SessionError, SessionOrchestrator,
        SignerRegistry, StaticChainContext,
    };
    use std::sync::Arc;

    // =========================================================================
    // FIXTURES
    // =========================================================================

    fn thread_args() -> CallArgs {
        [
            ("community", json!("c")),
            ("title", json!("t")),
            ("body", json!("b")),
            ("link", json!("")),
            ("topic", json!("")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn session_payload(from: &str, session_address: &str) -> SessionPayload {
        SessionPayload {
            app: "commonwealth".to_string(),
            block: Some("0x5f2d".to_string()),
            chain: "eip155:1".to_string(),
            from: from.to_string(),
            session_address: session_address.to_string(),
            session_duration: 86_400_000,
            session_issued: 1_665_083_987_891,
        }
    }

    // =========================================================================
    // SIGNER LEVEL
    // =========================================================================

    #[tokio::test]
    async fn test_fresh_storage_to_signed_thread() {
        let store = Arc::new(InMemorySessionStore::new());
        let signer = EthereumSigner::new(store.clone());

        let session_address = signer.get_or_create_address("1").await.unwrap();

        let wallet = Secp256k1KeyPair::generate();
        let wallet_address = wallet.public_key().eth_address().unwrap();
        let payload = session_payload(&wallet_address, &session_address);
        let digest = session_digest(&payload);
        let signature = to_hex_prefixed(&wallet.sign_prehash(&digest).unwrap().to_eth_bytes());
        assert_eq!(recover_signer(&digest, &signature).unwrap(), wallet_address);

        signer
            .auth_session("1", payload.clone(), signature.clone())
            .await
            .unwrap();

        let signed = signer.sign("1", "thread", thread_args()).await.unwrap();
        let action = signed.decode_action().unwrap();
        let session = signed.decode_session().unwrap();

        assert_eq!(action.session, wallet_address);
        assert_eq!(action.payload.from, wallet_address);
        assert_eq!(action.payload.block, payload.block);
        assert_eq!(action.payload.call_args, thread_args());
        assert_eq!(action.hash().unwrap(), signed.hash);
        assert_eq!(session.payload, payload);
        assert_eq!(session.signature, signature);
        verify_signed_action(&session, &action).unwrap();

        // Both slots are persisted under the documented keys.
        let scope = SessionScope::new(ChainBase::Ethereum, "1");
        assert_eq!(StoreKey::key(&scope).to_string(), "SESSION-ethereum-1");
        assert!(store.get(&StoreKey::key(&scope)).unwrap().is_some());
        assert!(store.get(&StoreKey::auth(&scope)).unwrap().is_some());
    }

    // =========================================================================
    // ORCHESTRATOR LEVEL
    // =========================================================================

    fn orchestrator(wallet: LocalWallet) -> SessionOrchestrator<LocalWallet, StaticChainContext> {
        SessionOrchestrator::new(
            SignerRegistry::new(Arc::new(InMemorySessionStore::new())),
            wallet,
            StaticChainContext::new(ActiveChain::new(ChainBase::Ethereum, "1")),
            OrchestratorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_orchestrated_thread() {
        let wallet = LocalWallet::generate();
        let address = wallet.address(ChainBase::Ethereum, "1").unwrap();
        let sessions = orchestrator(wallet);

        let signed = sessions
            .sign_thread(&address, "c", "t", "b", "", None)
            .await
            .unwrap();

        let action = signed.decode_action().unwrap();
        assert_eq!(action.session, address);
        assert_eq!(action.payload.call_args, thread_args());
        assert_eq!(action.hash().unwrap(), signed.hash);
    }

    #[tokio::test]
    async fn test_wallet_on_other_account_is_address_mismatch() {
        let wallet = LocalWallet::generate();
        let b = wallet.address(ChainBase::Ethereum, "1").unwrap();
        let a = LocalWallet::generate()
            .address(ChainBase::Ethereum, "1")
            .unwrap();
        let sessions = orchestrator(wallet);

        let err = sessions
            .sign_thread(&a, "c", "t", "b", "", None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SessionError::AddressMismatch {
                expected: a.clone(),
                actual: b.clone()
            }
        );
        assert!(err.is_user_recoverable());
        let message = err.to_string();
        assert!(message.contains(&a) && message.contains(&b));

        // Nothing was cached for the wrong wallet.
        let signer = sessions.get_session_controller(ChainBase::Ethereum);
        assert!(!signer.has_authenticated_session("1").await.unwrap());
    }
}
