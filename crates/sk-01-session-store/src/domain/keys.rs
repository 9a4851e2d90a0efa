//! # Store Keys
//!
//! One scope owns exactly two slots. Key strings are part of the persisted
//! format and must not change.

use shared_types::{SessionScope, AUTH_SUFFIX};
use std::fmt;

/// Prefix of every session record key.
pub const KEY_PREFIX: &str = "SESSION";

/// Which record of a scope a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySlot {
    /// The session key material.
    Key,
    /// The cached wallet authorization.
    Auth,
}

/// Address of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    scope: SessionScope,
    slot: KeySlot,
}

impl StoreKey {
    /// The key slot of `scope`.
    pub fn key(scope: &SessionScope) -> Self {
        Self {
            scope: scope.clone(),
            slot: KeySlot::Key,
        }
    }

    /// The authorization slot of `scope`.
    pub fn auth(scope: &SessionScope) -> Self {
        Self {
            scope: scope.clone(),
            slot: KeySlot::Auth,
        }
    }

    /// Scope this key belongs to.
    pub fn scope(&self) -> &SessionScope {
        &self.scope
    }

    /// Slot within the scope.
    pub fn slot(&self) -> KeySlot {
        self.slot
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            KEY_PREFIX,
            self.scope.base.family_name(),
            self.scope.chain_id
        )?;
        if self.slot == KeySlot::Auth {
            f.write_str(AUTH_SUFFIX)?;
        }
        Ok(())
    }
}
