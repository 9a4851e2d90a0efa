//! # Session Orchestrator (sk-03)
//!
//! Ties the chain signers to a wallet. The orchestrator picks the signer of
//! the active chain, asks the wallet for a session authorization when the
//! scope has none, and signs domain actions (threads, comments, reactions)
//! with the session key.
//!
//! ## Authorization Flow
//!
//! ```text
//! sign_thread(address, ..)
//!   │
//!   ├─ ChainContext::active_chain()         → (ChainBase, chain id)
//!   ├─ per-scope lock (single flight)
//!   ├─ signer.has_authenticated_session()
//!   │     └─ false: WalletCollaborator::sign_session(payload)
//!   │                 ├─ cancelled      → LoginCancelled
//!   │                 ├─ other address  → AddressMismatch (nothing cached)
//!   │                 └─ ok             → signer.auth_session()
//!   └─ signer.sign(call, args)              → SignedAction
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Domain actions, configuration, errors
//! - `ports/` - Inbound `SessionApi`, outbound wallet and chain-context ports
//! - `adapters/` - Local development wallet, static chain context
//! - `registry.rs` - One signer per chain family
//! - `service.rs` - `SessionOrchestrator`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod registry;
pub mod service;

pub use adapters::{LocalWallet, StaticChainContext};
pub use domain::{DomainAction, OrchestratorConfig, SessionError};
pub use ports::{
    ActiveChain, ChainContext, SessionApi, SessionRequest, SignedSession, WalletCollaborator,
    WalletError,
};
pub use registry::SignerRegistry;
pub use service::SessionOrchestrator;
