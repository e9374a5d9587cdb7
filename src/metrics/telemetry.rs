//! Exporter self-telemetry.
//!
//! Metrics about the exporter itself (how listing went, how long passes
//! took) live in a regular `prometheus` registry, separate from the
//! resource metrics rendered by the collectors.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;

/// Errors that can occur during telemetry operations.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Metric construction or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

const RESULT_SUCCESS: &str = "success";
const RESULT_ERROR: &str = "error";

/// Prometheus registry holding the exporter's own metrics.
///
/// Cloning is cheap and clones share the same underlying metrics.
#[derive(Clone)]
pub struct Telemetry {
    registry: Registry,
    list_total: IntCounterVec,
    resources: IntGaugeVec,
    collect_duration: HistogramVec,
}

impl Telemetry {
    /// Creates a telemetry registry with all exporter metrics registered.
    pub fn new() -> Result<Self, TelemetryError> {
        let registry = Registry::new();

        let list_total = IntCounterVec::new(
            Opts::new(
                "kube_state_exporter_list_total",
                "Number of resource list operations by kind and result",
            ),
            &["kind", "result"],
        )?;
        let resources = IntGaugeVec::new(
            Opts::new(
                "kube_state_exporter_resources",
                "Number of resources seen in the last collection pass",
            ),
            &["kind"],
        )?;
        let collect_duration = HistogramVec::new(
            HistogramOpts::new(
                "kube_state_exporter_collect_duration_seconds",
                "Duration of a collection pass in seconds",
            ),
            &["kind"],
        )?;

        registry.register(Box::new(list_total.clone()))?;
        registry.register(Box::new(resources.clone()))?;
        registry.register(Box::new(collect_duration.clone()))?;

        Ok(Self {
            registry,
            list_total,
            resources,
            collect_duration,
        })
    }

    /// Records a successful collection pass.
    pub fn record_success(&self, kind: &str, resources: usize, elapsed: Duration) {
        self.list_total
            .with_label_values(&[kind, RESULT_SUCCESS])
            .inc();
        self.resources
            .with_label_values(&[kind])
            .set(resources as i64);
        self.collect_duration
            .with_label_values(&[kind])
            .observe(elapsed.as_secs_f64());
    }

    /// Records a pass that failed to list resources.
    pub fn record_failure(&self, kind: &str) {
        self.list_total.with_label_values(&[kind, RESULT_ERROR]).inc();
    }

    /// Number of successful list operations for a kind.
    pub fn successes(&self, kind: &str) -> u64 {
        self.list_total
            .with_label_values(&[kind, RESULT_SUCCESS])
            .get()
    }

    /// Number of failed list operations for a kind.
    pub fn failures(&self, kind: &str) -> u64 {
        self.list_total.with_label_values(&[kind, RESULT_ERROR]).get()
    }

    /// Encodes all telemetry in Prometheus text format.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
