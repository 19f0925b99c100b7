//! Prometheus metrics for document store traffic.
//!
//! Every load and save is counted per document, failures are counted per
//! error kind, and store latency is recorded as a histogram.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::error::StoreError;
use crate::store::DocumentKind;

// === Metric Name Constants ===

/// Document loads counter metric name.
pub const METRIC_DOCUMENT_LOADS: &str = "document_loads_total";
/// Defaults served counter metric name.
pub const METRIC_DEFAULTS_SERVED: &str = "document_defaults_served_total";
/// Document saves counter metric name.
pub const METRIC_DOCUMENT_SAVES: &str = "document_saves_total";
/// Store errors counter metric name.
pub const METRIC_STORE_ERRORS: &str = "store_errors_total";
/// Store operation latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup, after the recorder is installed.
pub fn init_metrics() {
    describe_counter!(METRIC_DOCUMENT_LOADS, "Total number of successful document loads");
    describe_counter!(
        METRIC_DEFAULTS_SERVED,
        "Loads answered with the built-in default because no document was saved"
    );
    describe_counter!(METRIC_DOCUMENT_SAVES, "Total number of successful document saves");
    describe_counter!(METRIC_STORE_ERRORS, "Total number of failed store operations");
    describe_histogram!(METRIC_STORE_LATENCY, "Store operation latency in milliseconds");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record the outcome and latency of one store operation.
pub fn record_store_op<T>(
    kind: DocumentKind,
    op: &'static str,
    start: Instant,
    result: &Result<T, StoreError>,
) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_STORE_LATENCY, "document" => kind.to_string(), "op" => op).record(latency_ms);

    match result {
        Ok(_) if op == "save" => {
            counter!(METRIC_DOCUMENT_SAVES, "document" => kind.to_string()).increment(1);
        }
        Ok(_) => {
            counter!(METRIC_DOCUMENT_LOADS, "document" => kind.to_string()).increment(1);
        }
        Err(e) => {
            counter!(
                METRIC_STORE_ERRORS,
                "document" => kind.to_string(),
                "op" => op,
                "error" => e.label()
            )
            .increment(1);
        }
    }
}

/// Increment the defaults-served counter.
pub fn inc_defaults_served(kind: DocumentKind) {
    counter!(METRIC_DEFAULTS_SERVED, "document" => kind.to_string()).increment(1);
}
