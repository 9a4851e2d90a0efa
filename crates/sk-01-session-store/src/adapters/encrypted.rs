use crate::domain::{StoreError, StoreKey};
use crate::ports::SessionStore;
use shared_crypto::encoding::{from_base64, to_base64};
use shared_crypto::{open, seal, SecretKey};

/// Encrypts every value before handing it to an inner store.
///
/// Values are sealed with XChaCha20-Poly1305 and stored as base64 of
/// `nonce || ciphertext`. Keys stay in clear so the layout is unchanged.
/// A value that fails to decrypt is reported as `StoreError::Unreadable`,
/// which signers treat like any other unrestorable record.
pub struct EncryptedSessionStore<S> {
    inner: S,
    key: SecretKey,
}

impl<S: SessionStore> EncryptedSessionStore<S> {
    /// Wrap `inner`, sealing values under `key`.
    pub fn new(inner: S, key: SecretKey) -> Self {
        Self { inner, key }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: SessionStore> SessionStore for EncryptedSessionStore<S> {
    fn get(&self, key: &StoreKey) -> Result<Option<String>, StoreError> {
        let Some(encoded) = self.inner.get(key)? else {
            return Ok(None);
        };

        let unreadable = |reason: String| StoreError::Unreadable {
            key: key.to_string(),
            reason,
        };

        let sealed = from_base64(&encoded).map_err(|e| unreadable(e.to_string()))?;
        let plaintext = open(&self.key, &sealed).map_err(|e| unreadable(e.to_string()))?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|e| unreadable(e.to_string()))
    }

    fn put(&self, key: &StoreKey, value: &str) -> Result<(), StoreError> {
        let sealed =
            seal(&self.key, value.as_bytes()).map_err(|e| StoreError::Encryption(e.to_string()))?;
        self.inner.put(key, &to_base64(&sealed))
    }

    fn delete(&self, key: &StoreKey) -> Result<(), StoreError> {
        self.inner.delete(key)
    }
}
