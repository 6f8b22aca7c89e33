//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Transaction submission and confirmation
//! - Status polling
//! - Simulations
//!
//! Metrics are registered in the default registry; `gather` renders them for
//! whatever endpoint the embedding process exposes.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use std::time::Duration;

lazy_static! {
    // Transaction metrics
    pub static ref TX_SUBMITTED: Counter = register_counter!(
        "txflow_transactions_submitted_total",
        "Total transactions accepted for submission"
    ).unwrap();

    pub static ref TX_CONFIRMED: Counter = register_counter!(
        "txflow_transactions_confirmed_total",
        "Total transactions confirmed with a return value"
    ).unwrap();

    pub static ref TX_FAILED: CounterVec = register_counter_vec!(
        "txflow_transactions_failed_total",
        "Total transactions that did not confirm, by error kind",
        &["kind"]
    ).unwrap();

    pub static ref TX_LATENCY: Histogram = register_histogram!(
        "txflow_confirmation_latency_seconds",
        "Time from submission to confirmation",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]
    ).unwrap();

    // Polling metrics
    pub static ref POLL_ATTEMPTS: Counter = register_counter!(
        "txflow_poll_attempts_total",
        "Total transaction status queries"
    ).unwrap();

    // Simulation metrics
    pub static ref SIMULATIONS: CounterVec = register_counter_vec!(
        "txflow_simulations_total",
        "Total simulations by outcome",
        &["outcome"]
    ).unwrap();
}

/// Render all registered metrics in the text exposition format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

// Helper functions to record metrics

pub fn record_tx_submitted() {
    TX_SUBMITTED.inc();
}

pub fn record_tx_confirmed(latency: Duration) {
    TX_CONFIRMED.inc();
    TX_LATENCY.observe(latency.as_secs_f64());
}

pub fn record_tx_failed(kind: &str) {
    TX_FAILED.with_label_values(&[kind]).inc();
}

pub fn record_poll_attempt() {
    POLL_ATTEMPTS.inc();
}

pub fn record_simulation(ok: bool) {
    SIMULATIONS
        .with_label_values(&[if ok { "ok" } else { "error" }])
        .inc();
}
