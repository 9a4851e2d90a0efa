use crate::domain::{StoreError, StoreKey};
use crate::ports::SessionStore;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory session store.
///
/// Records live for the lifetime of the value. Also used to simulate a
/// "restart" in tests by handing the same store to a fresh signer.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    data: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw value under an arbitrary key string.
    ///
    /// Lets tests plant records that no signer would produce.
    pub fn put_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().insert(key.into(), value.into());
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        Ok(self.data.read().get(&key.to_string()).cloned())
    }

    fn put(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StoreError> {
        self.data.write().remove(&key.to_string());
        Ok(())
    }
}
