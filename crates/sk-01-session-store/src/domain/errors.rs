//! # Domain Errors
//!
//! Failures of the underlying storage medium. A missing value is not an
//! error: `get` returns `Ok(None)`.

use thiserror::Error;

/// Errors that can occur while reading or writing session records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File involved.
        path: String,
        /// OS error text.
        message: String,
    },

    /// The backing document is not a JSON object of strings.
    #[error("Store document is malformed: {0}")]
    MalformedDocument(String),

    /// A stored value could not be decrypted or decoded.
    #[error("Stored value for {key} is unreadable: {reason}")]
    Unreadable {
        /// Store key of the value.
        key: String,
        /// Decoder or cipher message.
        reason: String,
    },

    /// A value could not be encrypted.
    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
