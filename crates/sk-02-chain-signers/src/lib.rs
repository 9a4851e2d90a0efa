//! # Chain Signers (sk-02)
//!
//! One session-key signer per chain family, all behind the `SessionSigner`
//! capability trait.
//!
//! ## Families
//!
//! | Family | Key | Address | Action signature |
//! |--------|-----|---------|------------------|
//! | Ethereum | secp256k1 | EIP-55 hex | EIP-712 typed data, `0x` r‖s‖v |
//! | Substrate | ed25519 (BIP-39) | `0x` hex public key | ed25519, `0x` hex |
//! | Cosmos SDK | secp256k1 | bech32 (prefix = chain id) | ADR-036 `StdSignature` JSON |
//! | Solana | ed25519 | base58 public key | ed25519, base58 |
//! | NEAR | ed25519 | `ed25519:` base58 public key | ed25519, base64 |
//!
//! ## Session Lifecycle (per chain id)
//!
//! ```text
//! NoSession ──get_or_create_address──→ UnauthenticatedSession
//!                                          │  ▲
//!                             auth_session │  │ clear_session / restore mismatch
//!                                          ▼  │
//!                                     AuthenticatedSession ──sign──→ SignedAction
//! ```
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Per-family key material, signing and verification
//! - `ports/` - The `SessionSigner` inbound API
//! - `service.rs` - `ChainSigner<K>`: restore, persist, authorize, sign

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{
    same_address, verify_signed_action, CosmosKey, EthereumKey, NearKey, SessionAuthorization, SessionKey,
    SignerError, SolanaKey, SubstrateKey,
};
pub use ports::SessionSigner;
pub use service::ChainSigner;

/// Ethereum / EVM signer.
pub type EthereumSigner = ChainSigner<EthereumKey>;
/// Substrate signer.
pub type SubstrateSigner = ChainSigner<SubstrateKey>;
/// Cosmos SDK signer.
pub type CosmosSigner = ChainSigner<CosmosKey>;
/// Solana signer.
pub type SolanaSigner = ChainSigner<SolanaKey>;
/// NEAR signer.
pub type NearSigner = ChainSigner<NearKey>;
