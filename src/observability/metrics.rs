//! Metrics collection and exposition.
//!
//! # Metrics
//! - `spa_shell_requests_total` (counter): requests by server route, status
//! - `spa_shell_request_duration_seconds` (histogram): handler latency by route

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const REQUESTS_TOTAL: &str = "spa_shell_requests_total";
pub const REQUEST_DURATION: &str = "spa_shell_request_duration_seconds";

/// Start the Prometheus scrape endpoint. Must be called inside the runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(route: &'static str, status: u16, started: Instant) {
    metrics::counter!(REQUESTS_TOTAL, "route" => route, "status" => status.to_string())
        .increment(1);
    metrics::histogram!(REQUEST_DURATION, "route" => route)
        .record(started.elapsed().as_secs_f64());
}
