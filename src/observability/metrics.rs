//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_routing_decisions_total` (counter): decisions by zone
//! - `edge_requests_total` (counter): forwarded requests by method, status, zone
//! - `edge_request_duration_seconds` (histogram): end-to-end latency by zone

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::Zone;

/// Install the Prometheus recorder and its scrape listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_routing_decision(zone: Zone) {
    counter!("edge_routing_decisions_total", "zone" => zone.as_str()).increment(1);
}

pub fn record_request(method: &str, status: u16, zone: Zone, start: Instant) {
    counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "zone" => zone.as_str()
    )
    .increment(1);
    histogram!("edge_request_duration_seconds", "zone" => zone.as_str())
        .record(start.elapsed().as_secs_f64());
}
