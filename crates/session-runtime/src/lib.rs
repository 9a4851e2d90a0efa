//! # Session Runtime
//!
//! Builds a ready-to-use `SessionOrchestrator` from environment
//! configuration.
//!
//! ## Startup Sequence
//!
//! 1. Load `RuntimeConfig` from the environment and validate it
//! 2. Initialize telemetry
//! 3. Open the session store (file or memory, optionally encrypted)
//! 4. Build the signer registry and the orchestrator

pub mod container;

pub use container::{ConfigError, RuntimeConfig, SessionContainer};
