//! Observability infrastructure for the facade
//!
//! Provides:
//! - Prometheus metrics (request outcomes, source call latency, serving mode)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for source calls (in seconds); live calls cross the network
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<FacadeMetricsInner> = OnceLock::new();

struct FacadeMetricsInner {
    requests_total: IntCounterVec,
    source_latency_seconds: HistogramVec,
    mock_mode: IntGauge,
}

impl FacadeMetricsInner {
    fn new() -> Self {
        Self {
            requests_total: register_int_counter_vec!(
                "schedview_requests_total",
                "Facade operations by resource, operation and outcome",
                &["resource", "operation", "outcome"]
            )
            .expect("Failed to register requests_total"),

            source_latency_seconds: register_histogram_vec!(
                "schedview_source_latency_seconds",
                "Time spent in source adapter calls",
                &["resource", "operation"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register source_latency_seconds"),

            mock_mode: register_int_gauge!(
                "schedview_mock_mode",
                "1 when fixtures serve every request, 0 for the live cluster"
            )
            .expect("Failed to register mock_mode"),
        }
    }
}

/// Lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct FacadeMetrics {
    _private: (),
}

impl Default for FacadeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FacadeMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(FacadeMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &FacadeMetricsInner {
        GLOBAL_METRICS.get_or_init(FacadeMetricsInner::new)
    }

    /// Count one finished operation. `outcome` is `ok` or an error category.
    pub fn record_request(&self, resource: &str, operation: &str, outcome: &str) {
        self.inner()
            .requests_total
            .with_label_values(&[resource, operation, outcome])
            .inc();
    }

    pub fn observe_source_latency(&self, resource: &str, operation: &str, duration_secs: f64) {
        self.inner()
            .source_latency_seconds
            .with_label_values(&[resource, operation])
            .observe(duration_secs);
    }

    pub fn set_mock_mode(&self, mock: bool) {
        self.inner().mock_mode.set(i64::from(mock));
    }
}

/// Structured logger for facade events
#[derive(Clone)]
pub struct StructuredLogger {
    source: String,
}

impl StructuredLogger {
    /// `source` names the backing store serving the process
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn log_startup(&self, version: &str, addr: &str) {
        info!(
            event = "facade_started",
            source = %self.source,
            version = %version,
            addr = %addr,
            "Scheduling facade started"
        );
    }

    /// Log the outcome of the live cluster client construction
    pub fn log_client_init(&self, connected: bool, detail: &str) {
        if connected {
            info!(
                event = "cluster_client_init",
                source = %self.source,
                connected = true,
                detail = %detail,
                "Cluster client initialized"
            );
        } else {
            warn!(
                event = "cluster_client_init",
                source = %self.source,
                connected = false,
                detail = %detail,
                "Cluster client unavailable, live reads will fail"
            );
        }
    }

    /// Log a failed source call; the cause never reaches the caller
    pub fn log_source_failure(&self, resource: &str, operation: &str, error: &dyn std::error::Error) {
        error!(
            event = "source_failure",
            source = %self.source,
            resource = %resource,
            operation = %operation,
            error = %error,
            "Source call failed"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "facade_shutdown",
            source = %self.source,
            reason = %reason,
            "Scheduling facade shutting down"
        );
    }
}
