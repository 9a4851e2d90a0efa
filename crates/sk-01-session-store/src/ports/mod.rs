//! # Ports
//!
//! The storage contract consumed by chain signers.

use crate::domain::{StoreError, StoreKey};

/// Durable string-valued key-value storage for session records.
///
/// Implementations use interior mutability so one store can be shared by
/// every signer behind an `Arc`. Each signer only writes keys of its own
/// scopes; there is no cross-scope coordination.
pub trait SessionStore: Send + Sync {
    /// Read a record. `Ok(None)` when the key was never written or deleted.
    fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError>;

    /// Write a record, replacing any previous value.
    fn put(&self, key: &StoreKey, value: &str) -> Result<(), StoreError>;

    /// Remove a record. Removing a missing key succeeds.
    fn delete(&self, key: &StoreKey) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
