//! # Orchestrator Configuration

use std::time::Duration;

/// Default application identifier carried in every payload.
pub const DEFAULT_APP_ID: &str = "commonwealth";

/// Default intended session lifetime: one day.
pub const DEFAULT_SESSION_DURATION_MS: u64 = 86_400_000;

/// Settings of the session orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// `app` field of minted session payloads.
    pub app_id: String,
    /// `sessionDuration` of minted session payloads, in milliseconds.
    pub session_duration_ms: u64,
    /// Upper bound on the wallet authorization wait. `None` waits until the
    /// wallet answers or the login is cancelled.
    pub auth_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            session_duration_ms: DEFAULT_SESSION_DURATION_MS,
            auth_timeout: None,
        }
    }
}

impl OrchestratorConfig {
    /// Set the application identifier.
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    /// Set the intended session lifetime.
    pub fn with_session_duration_ms(mut self, duration_ms: u64) -> Self {
        self.session_duration_ms = duration_ms;
        self
    }

    /// Bound the wallet authorization wait.
    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = Some(timeout);
        self
    }
}
