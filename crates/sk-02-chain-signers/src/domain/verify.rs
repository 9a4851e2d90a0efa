//! # Signed Action Verification
//!
//! The receiving side of a `SignedAction`: given the two envelopes, check
//! that they belong together and that the action was signed by the session
//! key the session delegates to.

use shared_types::{Action, ChainBase, Session};

use crate::domain::errors::SignerError;
use crate::domain::session_key::SessionKey;
use crate::domain::{CosmosKey, EthereumKey, NearKey, SolanaKey, SubstrateKey};

/// Verify an action against the session that authorizes it.
///
/// Checks, in order: the envelopes agree on wallet, chain and app; the
/// wallet signature over the session (families with a verification
/// primitive only); the session-key signature over the action.
pub fn verify_signed_action(session: &Session, action: &Action) -> Result<(), SignerError> {
    let (base, _) = ChainBase::parse_qualified_chain(&session.payload.chain)?;
    match base {
        ChainBase::Ethereum => verify_with::<EthereumKey>(session, action),
        ChainBase::Substrate => verify_with::<SubstrateKey>(session, action),
        ChainBase::CosmosSdk => verify_with::<CosmosKey>(session, action),
        ChainBase::Solana => verify_with::<SolanaKey>(session, action),
        ChainBase::Near => verify_with::<NearKey>(session, action),
    }
}

/// Address equality in the notation of `base`.
///
/// Hex families compare case-insensitively; base58 and bech32 addresses
/// compare exactly.
pub fn same_address(base: ChainBase, a: &str, b: &str) -> bool {
    match base {
        ChainBase::Ethereum => EthereumKey::same_address(a, b),
        ChainBase::Substrate => SubstrateKey::same_address(a, b),
        ChainBase::CosmosSdk => CosmosKey::same_address(a, b),
        ChainBase::Solana => SolanaKey::same_address(a, b),
        ChainBase::Near => NearKey::same_address(a, b),
    }
}

fn verify_with<K: SessionKey>(session: &Session, action: &Action) -> Result<(), SignerError> {
    let wallet = &session.payload.from;

    if !K::same_address(&action.session, wallet) {
        return Err(SignerError::EnvelopeMismatch(format!(
            "action delegated by {}, session issued by {wallet}",
            action.session
        )));
    }
    if !K::same_address(&action.payload.from, wallet) {
        return Err(SignerError::EnvelopeMismatch(format!(
            "action from {}, session issued by {wallet}",
            action.payload.from
        )));
    }
    if action.payload.chain != session.payload.chain {
        return Err(SignerError::EnvelopeMismatch(format!(
            "action on {}, session on {}",
            action.payload.chain, session.payload.chain
        )));
    }
    if action.payload.app != session.payload.app {
        return Err(SignerError::EnvelopeMismatch(format!(
            "action for app {}, session for app {}",
            action.payload.app, session.payload.app
        )));
    }

    K::verify_authorization(&session.payload, &session.signature)?;
    K::verify_action(
        &session.payload.session_address,
        &action.payload,
        &action.signature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{ActionPayload, SessionPayload};

    fn signed_pair(key: &SubstrateKey) -> (Session, Action) {
        let session = Session::new(
            SessionPayload {
                app: "commonwealth".to_string(),
                block: None,
                chain: "polkadot:edgeware".to_string(),
                from: "0xwallet".to_string(),
                session_address: key.address().to_string(),
                session_duration: 1_000,
                session_issued: 1,
            },
            "wallet-sig",
        );
        let payload = ActionPayload {
            app: "commonwealth".to_string(),
            block: None,
            call: "deleteThread".to_string(),
            call_args: [("thread_id".to_string(), serde_json::json!(7))].into(),
            chain: "polkadot:edgeware".to_string(),
            from: "0xwallet".to_string(),
            timestamp: 2,
        };
        let signature = key.sign_action(&payload).unwrap();
        (session, Action::new(payload, "0xwallet", signature))
    }

    #[test]
    fn test_valid_pair_verifies() {
        let key = SubstrateKey::generate("edgeware").unwrap();
        let (session, action) = signed_pair(&key);
        verify_signed_action(&session, &action).unwrap();
    }

    #[test]
    fn test_tampered_args_rejected() {
        let key = SubstrateKey::generate("edgeware").unwrap();
        let (session, mut action) = signed_pair(&key);
        action
            .payload
            .call_args
            .insert("thread_id".to_string(), serde_json::json!(8));
        assert!(verify_signed_action(&session, &action).is_err());
    }

    #[test]
    fn test_foreign_session_rejected() {
        let key = SubstrateKey::generate("edgeware").unwrap();
        let (mut session, action) = signed_pair(&key);
        session.payload.from = "0xsomeone".to_string();
        assert!(matches!(
            verify_signed_action(&session, &action),
            Err(SignerError::EnvelopeMismatch(_))
        ));
    }

    #[test]
    fn test_same_address_notation() {
        assert!(same_address(ChainBase::Ethereum, "0xAbC", "0xabc"));
        assert!(!same_address(ChainBase::Solana, "AbC", "abc"));
    }
}
