//! Prometheus metrics for the session-key subsystems.
//!
//! All metrics follow the naming convention: `sk_<area>_<metric>_<unit>`.
//! Every vector carries a `family` label (`ethereum`, `substrate`, ...).

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, CounterVec, Encoder, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SIGNER METRICS (sk-02)
    // =========================================================================

    /// Session keys generated (fresh scope or regenerated after restore failure)
    pub static ref SESSION_KEYS_CREATED: CounterVec = CounterVec::new(
        Opts::new("sk_signer_keys_created_total", "Session keys generated"),
        &["family"]
    ).expect("metric creation failed");

    /// Persisted records that could not be restored
    pub static ref RESTORE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("sk_signer_restore_failures_total", "Unrestorable persisted session records"),
        &["family", "slot"]  // slot: key/auth
    ).expect("metric creation failed");

    /// Wallet authorizations presented to a signer
    pub static ref AUTHORIZATIONS: CounterVec = CounterVec::new(
        Opts::new("sk_signer_authorizations_total", "Wallet authorizations by outcome"),
        &["family", "outcome"]  // outcome: accepted/rejected
    ).expect("metric creation failed");

    /// Actions signed by session keys
    pub static ref ACTIONS_SIGNED: CounterVec = CounterVec::new(
        Opts::new("sk_signer_actions_signed_total", "Actions signed by session keys"),
        &["family", "call"]
    ).expect("metric creation failed");

    /// Time spent signing and self-verifying one action
    pub static ref SIGNING_DURATION: HistogramVec = HistogramVec::new(
        prometheus::HistogramOpts::new(
            "sk_signer_action_duration_seconds",
            "Time spent signing and self-verifying an action"
        ).buckets(exponential_buckets(0.00001, 2.0, 15).expect("valid bucket layout")),
        &["family"]
    ).expect("metric creation failed");

    // =========================================================================
    // ORCHESTRATOR METRICS (sk-03)
    // =========================================================================

    /// Wallet prompts issued by the orchestrator
    pub static ref WALLET_PROMPTS: CounterVec = CounterVec::new(
        Opts::new("sk_orchestrator_wallet_prompts_total", "Wallet authorization prompts by outcome"),
        &["family", "outcome"]  // outcome: signed/cancelled/timed_out/failed/mismatch
    ).expect("metric creation failed");
}

/// Keeps the registry alive while telemetry is active.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Fails with `TelemetryError::MetricsInit` when called a second time.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Signers
        Box::new(SESSION_KEYS_CREATED.clone()),
        Box::new(RESTORE_FAILURES.clone()),
        Box::new(AUTHORIZATIONS.clone()),
        Box::new(ACTIONS_SIGNED.clone()),
        Box::new(SIGNING_DURATION.clone()),
        // Orchestrator
        Box::new(WALLET_PROMPTS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
