//! # Adapters
//!
//! - `memory` - process-local store for tests and ephemeral use
//! - `file` - single JSON document on disk
//! - `encrypted` - XChaCha20-Poly1305 wrapper over any other store

pub mod encrypted;
pub mod file;
pub mod memory;

pub use encrypted::EncryptedSessionStore;
pub use file::FileSessionStore;
pub use memory::InMemorySessionStore;
