//! Prometheus metrics for procurement-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, register_histogram_vec, CounterVec, Histogram,
    HistogramVec, TextEncoder,
};

/// HTTP request counter by route and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "procurement_http_requests_total",
        "Total number of HTTP requests",
        &["route", "status"]
    )
    .expect("Failed to register http_requests_total")
});

/// End-to-end AP summary build time, store reads included.
pub static AP_REPORT_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "procurement_ap_report_duration_seconds",
        "AP summary report duration in seconds",
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register ap_report_duration")
});

/// Financial breakdowns computed, by document kind.
pub static BREAKDOWNS_COMPUTED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "procurement_breakdowns_computed_total",
        "Total number of financial breakdowns computed",
        &["document_kind"]
    )
    .expect("Failed to register breakdowns_computed_total")
});

/// Stored breakdowns that could not be read and were treated as zero.
pub static MALFORMED_BREAKDOWNS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "procurement_malformed_breakdowns_total",
        "Total number of unreadable stored financial breakdowns",
        &["document_kind"]
    )
    .expect("Failed to register malformed_breakdowns_total")
});

/// Store query duration histogram.
pub static STORE_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "procurement_store_query_duration_seconds",
        "Document store query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register store_query_duration")
});

/// Error counter for alerting.
pub static ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "procurement_errors_total",
        "Total number of errors by type",
        &["error_type"]
    )
    .expect("Failed to register errors_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&AP_REPORT_DURATION);
    Lazy::force(&BREAKDOWNS_COMPUTED_TOTAL);
    Lazy::force(&MALFORMED_BREAKDOWNS_TOTAL);
    Lazy::force(&STORE_QUERY_DURATION);
    Lazy::force(&ERRORS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
