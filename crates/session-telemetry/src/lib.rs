//! # Session Telemetry
//!
//! Logging and metrics shared by the session-key subsystems.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with an `EnvFilter` and a
//!   pretty or JSON formatting layer
//! - **Metrics**: Prometheus counters for key creation, authorizations,
//!   signed actions, restore failures and wallet prompts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use session_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `session-keys` | Service name attached to logs |
//! | `SK_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SK_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `SK_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, ACTIONS_SIGNED, AUTHORIZATIONS,
    REGISTRY, RESTORE_FAILURES, SESSION_KEYS_CREATED, SIGNING_DURATION, WALLET_PROMPTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed (usually: already set).
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// A metric could not be registered (usually: already registered).
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration, e.g. an unparsable filter directive.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    // Initialize metrics first (synchronous)
    let metrics = register_metrics()?;
    init_logging(config)?;

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
