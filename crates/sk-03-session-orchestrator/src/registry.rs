//! # Signer Registry
//!
//! One signer per chain family, owned by whoever builds the orchestrator.
//! All signers share one `SessionStore`; their persisted keys never collide
//! because every key is prefixed with the family name.

use shared_types::ChainBase;
use sk_01_session_store::SessionStore;
use sk_02_chain_signers::{
    CosmosSigner, EthereumSigner, NearSigner, SessionSigner, SolanaSigner, SubstrateSigner,
};
use std::sync::Arc;

use crate::domain::errors::SessionError;

/// The five chain-family signers.
pub struct SignerRegistry {
    ethereum: EthereumSigner,
    substrate: SubstrateSigner,
    cosmos: CosmosSigner,
    solana: SolanaSigner,
    near: NearSigner,
}

impl SignerRegistry {
    /// Build every signer over `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            ethereum: EthereumSigner::new(store.clone()),
            substrate: SubstrateSigner::new(store.clone()),
            cosmos: CosmosSigner::new(store.clone()),
            solana: SolanaSigner::new(store.clone()),
            near: NearSigner::new(store),
        }
    }

    /// Signer of `base`.
    pub fn get(&self, base: ChainBase) -> &dyn SessionSigner {
        match base {
            ChainBase::Ethereum => &self.ethereum,
            ChainBase::Substrate => &self.substrate,
            ChainBase::CosmosSdk => &self.cosmos,
            ChainBase::Solana => &self.solana,
            ChainBase::Near => &self.near,
        }
    }

    /// Signer of the family called `name` (`ethereum`, `cosmos`, ...).
    pub fn get_by_name(&self, name: &str) -> Result<&dyn SessionSigner, SessionError> {
        let base: ChainBase = name
            .parse()
            .map_err(|_| SessionError::UnsupportedChain(name.to_string()))?;
        Ok(self.get(base))
    }
}
