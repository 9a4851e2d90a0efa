//! Ports layer: the orchestrator's API and the collaborators it drives.

pub mod inbound;
pub mod outbound;

pub use inbound::SessionApi;
pub use outbound::{
    ActiveChain, ChainContext, SessionRequest, SignedSession, WalletCollaborator, WalletError,
};
