//! Metrics collection and exposition.
//!
//! # Metrics
//! - `account_lookup_requests_total` (counter): inbound lookups by outcome
//! - `account_lookup_provider_calls_total` (counter): provider calls by provider, outcome
//! - `account_lookup_provider_call_duration_seconds` (histogram): provider latency
//! - `account_lookup_circuit_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `account_lookup_short_circuited_total` (counter): calls refused by a breaker
//!
//! Without an installed recorder every function here is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

use crate::lookup::LookupOutcome;
use crate::resilience::CircuitState;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_lookup(outcome: LookupOutcome) {
    counter!("account_lookup_requests_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_provider_call(provider: &str, outcome: LookupOutcome, start: Instant) {
    counter!(
        "account_lookup_provider_calls_total",
        "provider" => provider.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!(
        "account_lookup_provider_call_duration_seconds",
        "provider" => provider.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_circuit_state(operation: &str, state: CircuitState) {
    gauge!("account_lookup_circuit_state", "operation" => operation.to_string()).set(state.as_gauge());
}

pub fn record_short_circuit(operation: &str) {
    counter!("account_lookup_short_circuited_total", "operation" => operation.to_string()).increment(1);
}
