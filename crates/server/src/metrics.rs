//! Prometheus metrics

use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder. Safe to call once at startup.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    match PROMETHEUS_HANDLE.get_or_try_init(|| PrometheusBuilder::new().install_recorder()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "failed to install metrics recorder");
            None
        }
    }
}

/// Count one chat request by composed response type.
pub fn record_request(response_type: &str) {
    metrics::counter!("crm_requests_total", "response_type" => response_type.to_string())
        .increment(1);
}

/// End-to-end chat handling latency.
pub fn record_chat_latency(elapsed: Duration) {
    metrics::histogram!("crm_chat_latency_seconds").record(elapsed.as_secs_f64());
}

/// Render the current metrics snapshot.
pub async fn metrics_handler() -> String {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => handle.render(),
        None => String::new(),
    }
}
