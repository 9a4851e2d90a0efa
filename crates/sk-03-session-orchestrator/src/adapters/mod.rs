//! Adapters layer: development implementations of the outbound ports.

pub mod chain_context;
pub mod local_wallet;

pub use chain_context::StaticChainContext;
pub use local_wallet::LocalWallet;
