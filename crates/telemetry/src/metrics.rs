//! Internal metrics collection.
//!
//! Counters and latency histograms held in memory and exposed through
//! the health endpoint. No external metrics backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum() as f64 / count as f64
        }
    }
}

/// Collected metrics for the aggregation engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Aggregation runs
    pub runs_started: Counter,
    pub runs_completed: Counter,
    pub runs_failed: Counter,
    pub runs_truncated: Counter,

    // Per-run work
    pub events_aggregated: Counter,
    pub events_rejected: Counter,
    pub wineries_processed: Counter,
    pub winery_failures: Counter,
    pub facet_upsert_errors: Counter,

    // Read side
    pub summaries_served: Counter,
    pub sample_summaries_served: Counter,

    // Latency histograms
    pub aggregation_latency_ms: Histogram,
    pub summary_latency_ms: Histogram,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            runs_started: self.runs_started.get(),
            runs_completed: self.runs_completed.get(),
            runs_failed: self.runs_failed.get(),
            runs_truncated: self.runs_truncated.get(),
            events_aggregated: self.events_aggregated.get(),
            events_rejected: self.events_rejected.get(),
            wineries_processed: self.wineries_processed.get(),
            winery_failures: self.winery_failures.get(),
            facet_upsert_errors: self.facet_upsert_errors.get(),
            summaries_served: self.summaries_served.get(),
            sample_summaries_served: self.sample_summaries_served.get(),
            aggregation_latency_mean_ms: self.aggregation_latency_ms.mean(),
            summary_latency_mean_ms: self.summary_latency_ms.mean(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub runs_truncated: u64,
    pub events_aggregated: u64,
    pub events_rejected: u64,
    pub wineries_processed: u64,
    pub winery_failures: u64,
    pub facet_upsert_errors: u64,
    pub summaries_served: u64,
    pub sample_summaries_served: u64,
    pub aggregation_latency_mean_ms: f64,
    pub summary_latency_mean_ms: f64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
