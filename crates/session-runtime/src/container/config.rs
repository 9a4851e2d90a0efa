//! # Runtime Configuration
//!
//! Everything the runtime needs, loaded from environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `SK_STORE_PATH` | JSON file holding session keys | in-memory store |
//! | `SK_STORE_KEY` | 64 hex chars, at-rest encryption key | unencrypted |
//! | `SK_APP_ID` | `app` of minted session payloads | `commonwealth` |
//! | `SK_SESSION_DURATION_MS` | intended session lifetime | one day |
//! | `SK_AUTH_TIMEOUT_SECS` | wallet prompt timeout | none |

use session_telemetry::TelemetryConfig;
use sk_03_session_orchestrator::OrchestratorConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `SK_STORE_KEY` is not 32 bytes of hex.
    #[error("SK_STORE_KEY must be 32 bytes (64 hex chars): {0}")]
    InvalidStoreKey(String),

    /// A numeric variable did not parse.
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// The application id is empty.
    #[error("Application id must not be empty")]
    EmptyAppId,

    /// The session duration is zero.
    #[error("Session duration must be positive")]
    ZeroSessionDuration,

    /// The wallet timeout is zero.
    #[error("Authorization timeout must be positive when set")]
    ZeroAuthTimeout,
}

/// Complete runtime configuration.
#[derive(Clone, Default)]
pub struct RuntimeConfig {
    /// Session store file; `None` keeps sessions in memory.
    pub store_path: Option<PathBuf>,
    /// At-rest encryption key of the store.
    pub store_key: Option<[u8; 32]>,
    /// Orchestrator settings.
    pub orchestrator: OrchestratorConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("store_path", &self.store_path)
            .field("store_key", &self.store_key.map(|_| "***"))
            .field("orchestrator", &self.orchestrator)
            .field("telemetry", &self.telemetry)
            .finish()
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            telemetry: TelemetryConfig::from_env(),
            ..Self::default()
        };

        if let Some(path) = lookup("SK_STORE_PATH").filter(|p| !p.trim().is_empty()) {
            config.store_path = Some(PathBuf::from(path));
        }
        if let Some(key) = lookup("SK_STORE_KEY") {
            config.store_key = Some(parse_key(&key)?);
        }
        if let Some(app_id) = lookup("SK_APP_ID") {
            config.orchestrator.app_id = app_id;
        }
        if let Some(value) = lookup("SK_SESSION_DURATION_MS") {
            config.orchestrator.session_duration_ms = parse_number("SK_SESSION_DURATION_MS", &value)?;
        }
        if let Some(value) = lookup("SK_AUTH_TIMEOUT_SECS") {
            let secs = parse_number("SK_AUTH_TIMEOUT_SECS", &value)?;
            config.orchestrator.auth_timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Persist sessions to `path`.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Encrypt the store with `key`.
    pub fn with_store_key(mut self, key: [u8; 32]) -> Self {
        self.store_key = Some(key);
        self
    }

    /// Replace the orchestrator settings.
    pub fn with_orchestrator(mut self, orchestrator: OrchestratorConfig) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    /// Check the configuration for values the runtime cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orchestrator.app_id.trim().is_empty() {
            return Err(ConfigError::EmptyAppId);
        }
        if self.orchestrator.session_duration_ms == 0 {
            return Err(ConfigError::ZeroSessionDuration);
        }
        if self.orchestrator.auth_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroAuthTimeout);
        }
        Ok(())
    }
}

fn parse_key(value: &str) -> Result<[u8; 32], ConfigError> {
    let trimmed = value.trim();
    let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .map_err(|e| ConfigError::InvalidStoreKey(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| ConfigError::InvalidStoreKey(format!("got {} bytes", b.len())))
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })
}
