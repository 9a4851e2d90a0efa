//! # Signer Errors
//!
//! `InvalidAuthorization`, `NoActiveSession` and `SignatureVerificationFailed`
//! are integrity errors: the calling action should abort. Restore failures
//! never appear here; they are logged and recovered by regenerating the key.

use shared_crypto::CryptoError;
use shared_types::TypesError;
use sk_01_session_store::StoreError;
use thiserror::Error;

/// Errors that can occur while authorizing or signing with a session key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    /// The wallet authorized a different session address than the local key.
    #[error("Invalid authorization: session key is {expected}, payload names {actual}")]
    InvalidAuthorization {
        /// Address derived from the local session key.
        expected: String,
        /// `sessionAddress` carried by the payload.
        actual: String,
    },

    /// The wallet signature over the session payload did not verify.
    #[error("Invalid wallet signature: {0}")]
    InvalidWalletSignature(String),

    /// `sign` was called with no cached authorization for the scope.
    #[error("No active session for chain {chain_id}")]
    NoActiveSession {
        /// Chain id of the scope.
        chain_id: String,
    },

    /// A signature this signer just produced did not verify.
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// A signature string could not be decoded.
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// A persisted key record could not be turned back into a key.
    #[error("Invalid key record: {0}")]
    InvalidKeyRecord(String),

    /// Session and action envelopes do not belong together.
    #[error("Envelope mismatch: {0}")]
    EnvelopeMismatch(String),

    /// Storage failure while persisting a key or an authorization.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Key or encoding failure.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Serialization failure.
    #[error(transparent)]
    Types(#[from] TypesError),
}

impl From<serde_json::Error> for SignerError {
    fn from(err: serde_json::Error) -> Self {
        SignerError::Types(TypesError::from(err))
    }
}
