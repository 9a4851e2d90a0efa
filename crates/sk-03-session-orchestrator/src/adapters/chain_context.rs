//! # Static Chain Context
//!
//! A `ChainContext` whose active chain is set explicitly, for binaries and
//! tests that have no UI to track navigation.

use parking_lot::RwLock;

use crate::ports::outbound::{ActiveChain, ChainContext};

/// Chain context with a settable active chain.
#[derive(Debug, Default)]
pub struct StaticChainContext {
    active: RwLock<Option<ActiveChain>>,
}

impl StaticChainContext {
    /// Start on `chain`.
    pub fn new(chain: ActiveChain) -> Self {
        Self {
            active: RwLock::new(Some(chain)),
        }
    }

    /// Switch to `chain`.
    pub fn set_active(&self, chain: ActiveChain) {
        *self.active.write() = Some(chain);
    }

    /// Leave every chain.
    pub fn clear(&self) {
        *self.active.write() = None;
    }
}

impl ChainContext for StaticChainContext {
    fn active_chain(&self) -> Option<ActiveChain> {
        self.active.read().clone()
    }
}
