//! Domain layer: actions, configuration and errors.

pub mod actions;
pub mod config;
pub mod errors;

pub use actions::DomainAction;
pub use config::OrchestratorConfig;
pub use errors::SessionError;
