//! # Shared Crypto - Session Key Primitives
//!
//! Key pairs, digests and address encodings shared by every chain signer.
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Ethereum and Cosmos session keys |
//! | `signatures` | Ed25519 | Substrate, Solana and NEAR session keys |
//! | `digest` | Keccak-256, SHA-256, RIPEMD-160 | Address derivation, sign docs |
//! | `encoding` | EIP-55, bech32, base58, base64 | Address and signature text forms |
//! | `mnemonic` | BIP-39 + PBKDF2-SHA512 | Substrate mini-secret derivation |
//! | `symmetric` | XChaCha20-Poly1305 | Session records at rest |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S normalization (EIP-2)
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **Secrets**: Debug output of every key type is redacted

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod digest;
pub mod ecdsa;
pub mod encoding;
pub mod errors;
pub mod mnemonic;
pub mod signatures;
pub mod symmetric;

// Re-exports
pub use digest::{hash160, keccak256, ripemd160, sha256};
pub use ecdsa::{RecoverableSignature, Secp256k1KeyPair, Secp256k1PublicKey};
pub use errors::CryptoError;
pub use mnemonic::Mnemonic;
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey};
pub use symmetric::{decrypt, encrypt, open, seal, Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
