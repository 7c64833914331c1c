//! Metrics and observability utilities
//!
//! Prometheus-style counters and histograms for each collaborator the
//! pipeline touches.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all LeadSpark metrics
pub const METRICS_PREFIX: &str = "leadspark";

/// Histogram buckets for model call latency (in seconds).
/// Completions take seconds, so the range is wide.
pub const MODEL_LATENCY_BUCKETS: &[f64] = &[
    0.250, 0.500, 1.000, 2.000, 5.000, 10.00, 20.00, 30.00, 60.00,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_sheet_reads_total", METRICS_PREFIX),
        Unit::Count,
        "Total spreadsheet reads by status"
    );

    describe_counter!(
        format!("{}_news_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Total news sub-queries by status"
    );

    describe_counter!(
        format!("{}_news_queries_empty_total", METRICS_PREFIX),
        Unit::Count,
        "News sub-queries that succeeded with zero items"
    );

    describe_counter!(
        format!("{}_starter_generations_total", METRICS_PREFIX),
        Unit::Count,
        "Total starter generations by outcome (model or fallback)"
    );

    describe_histogram!(
        format!("{}_model_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Language model call latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

fn status_label(success: bool) -> &'static str {
    if success { "success" } else { "error" }
}

/// Helper to record a spreadsheet read
pub fn record_sheet_read(success: bool) {
    counter!(
        format!("{}_sheet_reads_total", METRICS_PREFIX),
        "status" => status_label(success)
    )
    .increment(1);
}

/// Helper to record a single news sub-query
pub fn record_news_query(success: bool, result_count: usize) {
    counter!(
        format!("{}_news_queries_total", METRICS_PREFIX),
        "status" => status_label(success)
    )
    .increment(1);

    if success && result_count == 0 {
        counter!(format!("{}_news_queries_empty_total", METRICS_PREFIX)).increment(1);
    }
}

/// Helper to record a starter generation and the model latency behind it
pub fn record_starter_generation(duration_secs: f64, used_fallback: bool) {
    let outcome = if used_fallback { "fallback" } else { "model" };

    counter!(
        format!("{}_starter_generations_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(format!("{}_model_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}
