//! # Session Errors
//!
//! The full error taxonomy seen by callers of the orchestrator. Signer
//! failures pass through unchanged so a caller can match on
//! `SessionError::Signer(SignerError::NoActiveSession { .. })` and friends.

use shared_types::TypesError;
use sk_02_chain_signers::SignerError;
use thiserror::Error;

use crate::ports::outbound::WalletError;

/// Errors that can occur while orchestrating a session or signing an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The wallet authorized a session for a different address.
    #[error("Address mismatch: expected {expected}, wallet signed as {actual}")]
    AddressMismatch {
        /// Address the caller asked to act as.
        expected: String,
        /// Address the wallet actually signed with.
        actual: String,
    },

    /// The user abandoned the wallet authorization.
    #[error("Login cancelled")]
    LoginCancelled,

    /// The wallet did not answer within the configured timeout.
    #[error("Authorization timed out")]
    AuthorizationTimedOut,

    /// No chain is active in the current context.
    #[error("No active chain")]
    NoActiveChain,

    /// A chain family name did not resolve to a signer.
    #[error("Unsupported chain base: {0}")]
    UnsupportedChain(String),

    /// The wallet failed for a reason other than cancellation.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// A signer operation failed.
    #[error(transparent)]
    Signer(#[from] SignerError),

    /// Serialization failure.
    #[error(transparent)]
    Types(#[from] TypesError),
}

impl SessionError {
    /// Whether the user can act on this error (retry, switch account).
    ///
    /// Everything else is an integrity failure that should abort the action.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::LoginCancelled
                | SessionError::AddressMismatch { .. }
                | SessionError::AuthorizationTimedOut
        )
    }
}

impl From<WalletError> for SessionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Cancelled => SessionError::LoginCancelled,
            WalletError::UnsupportedChain(base) => SessionError::UnsupportedChain(base.to_string()),
            other => SessionError::Wallet(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_recoverable_classification() {
        assert!(SessionError::LoginCancelled.is_user_recoverable());
        assert!(SessionError::AddressMismatch {
            expected: "a".into(),
            actual: "b".into()
        }
        .is_user_recoverable());
        assert!(!SessionError::Signer(SignerError::SignatureVerificationFailed).is_user_recoverable());
        assert!(!SessionError::Signer(SignerError::NoActiveSession {
            chain_id: "1".into()
        })
        .is_user_recoverable());
    }

    #[test]
    fn test_wallet_cancel_maps_to_login_cancelled() {
        assert_eq!(
            SessionError::from(WalletError::Cancelled),
            SessionError::LoginCancelled
        );
        assert!(matches!(
            SessionError::from(WalletError::Rejected("nope".into())),
            SessionError::Wallet(_)
        ));
    }

    #[test]
    fn test_address_mismatch_names_both() {
        let err = SessionError::AddressMismatch {
            expected: "0xA".into(),
            actual: "0xB".into(),
        };
        let text = err.to_string();
        assert!(text.contains("0xA") && text.contains("0xB"));
    }
}
