//! # Session Store (sk-01)
//!
//! Durable local storage for the two records a chain signer keeps per scope:
//! the session key and the cached wallet authorization.
//!
//! ## Persisted Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `SESSION-<family>-<chainId>` | Family-specific key record (JSON) |
//! | `SESSION-<family>-<chainId>-auth` | `{ payload, signature }` (JSON) |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Store keys and errors
//! - `ports/` - The `SessionStore` trait consumed by signers
//! - `adapters/` - In-memory, file-backed and encrypting implementations
//!
//! ## Usage
//!
//! ```ignore
//! use sk_01_session_store::{FileSessionStore, SessionStore, StoreKey};
//!
//! let store = FileSessionStore::open("/var/lib/sessions.json")?;
//! store.put(&StoreKey::key(&scope), r#"{"privateKey":"0x.."}"#)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{EncryptedSessionStore, FileSessionStore, InMemorySessionStore};
pub use domain::{KeySlot, StoreError, StoreKey};
pub use ports::SessionStore;
