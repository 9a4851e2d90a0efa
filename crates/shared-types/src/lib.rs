//! # Shared Types Crate
//!
//! This crate contains the wire types exchanged between the session signers,
//! the orchestrator and whoever submits signed actions to a backend.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `SessionPayload`, `ActionPayload` and the
//!   `Session`/`Action` envelopes are defined once, here.
//! - **Byte-Exact Serialization**: every signature and hash is computed over
//!   `canonical_json` output (sorted keys, no whitespace). Changing a field
//!   name or its serde attribute changes the signed bytes.
//! - **Delegation Direction**: a `Session` proves wallet -> session key,
//!   an `Action` proves session key -> action.

pub mod canonical;
pub mod entities;
pub mod errors;

pub use canonical::{action_hash, canonical_json};
pub use entities::*;
pub use errors::*;
