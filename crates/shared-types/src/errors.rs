//! # Error Types
//!
//! Errors raised while building or serializing wire types.

use thiserror::Error;

/// Errors that can occur while handling shared wire types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypesError {
    /// A value could not be converted to or from JSON.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A chain family name was not recognised.
    #[error("Unknown chain base: {0}")]
    UnknownChainBase(String),

    /// A `chain` field is not `<namespace>:<chainId>` with a known namespace.
    #[error("Invalid qualified chain: {0}")]
    InvalidChain(String),

    /// A chain id that cannot own a session scope.
    #[error("Invalid chain id: {0:?}")]
    InvalidChainId(String),
}

impl From<serde_json::Error> for TypesError {
    fn from(err: serde_json::Error) -> Self {
        TypesError::Serialization(err.to_string())
    }
}
