// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for catalog-search.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host service is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `catalog_search_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: search, autocomplete, get_by_id, suggest, index
//! - `status`: success, error, invalid
//! - `outcome`: hit, miss, unavailable

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Record a finished request against the catalog service
pub fn record_request(operation: &str, status: &str) {
    counter!(
        "catalog_search_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record operation latency
pub fn record_latency(operation: &str, duration: Duration) {
    histogram!(
        "catalog_search_operation_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record the total match count of a search
pub fn record_search_results(total: u64) {
    histogram!("catalog_search_results").record(total as f64);
}

/// Record an autocomplete cache lookup outcome (hit, miss, unavailable)
pub fn record_cache_lookup(outcome: &'static str) {
    counter!(
        "catalog_search_autocomplete_cache_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a cache write that was dropped
pub fn record_cache_write_failure() {
    counter!("catalog_search_cache_write_failures_total").increment(1);
}

/// Record a failed "did you mean" lookup
pub fn record_suggestion_failure() {
    counter!("catalog_search_suggestion_failures_total").increment(1);
}

/// Record index creation
pub fn record_index_operation(operation: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "catalog_search_index_operations_total",
        "operation" => operation.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record a reindex run
pub fn record_reindex(succeeded: usize, failed: usize) {
    counter!("catalog_search_reindexed_total", "status" => "success").increment(succeeded as u64);
    counter!("catalog_search_reindexed_total", "status" => "failure").increment(failed as u64);
}

/// Set backend reachability (1 = up, 0 = down)
pub fn set_backend_up(backend: &str, up: bool) {
    gauge!(
        "catalog_search_backend_up",
        "backend" => backend.to_string()
    )
    .set(if up { 1.0 } else { 0.0 });
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.operation, self.start.elapsed());
    }
}

/// Convenience macro for timing operations
#[macro_export]
macro_rules! time_operation {
    ($op:expr) => {
        $crate::metrics::LatencyTimer::new($op)
    };
}
