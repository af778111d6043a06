//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Backend lookups (outcomes, durations)
//! - Aggregated results (candidates per lookup)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Backend Metrics
// =============================================================================

/// Backend lookups total by outcome.
pub static BACKEND_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magnetar_backend_outcomes_total",
            "Total backend lookups by outcome",
        ),
        &["backend", "outcome"], // outcome: "success", "error", "timeout", "cancelled"
    )
    .unwrap()
});

/// Backend lookup duration in seconds.
pub static BACKEND_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "magnetar_backend_duration_seconds",
            "Duration of a single backend lookup",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["backend"],
    )
    .unwrap()
});

// =============================================================================
// Aggregator Metrics
// =============================================================================

/// Candidates returned per successful lookup, after deduplication.
pub static CANDIDATES_RETURNED: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "magnetar_candidates_returned",
            "Number of candidates returned per lookup",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &["kind"], // "movie", "episode"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(BACKEND_OUTCOMES.clone()),
        Box::new(BACKEND_DURATION.clone()),
        Box::new(CANDIDATES_RETURNED.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register_once() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        BACKEND_OUTCOMES.with_label_values(&["test", "success"]).inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"magnetar_backend_outcomes_total".to_string()));
    }
}
