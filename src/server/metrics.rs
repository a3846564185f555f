//! Process-wide analysis metrics
//!
//! Counters only ever increase for the lifetime of the process and are
//! updated with atomics, so handlers share one instance without locking.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const BUCKET_COUNT: usize = 11;

/// Upper bounds (seconds) of the duration histogram buckets
const DURATION_BUCKETS: [f64; BUCKET_COUNT] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Request, error and duration metrics for `/analyze`
#[derive(Debug)]
pub struct Metrics {
    analyses_total: AtomicU64,
    errors_total: AtomicU64,
    duration_buckets: [AtomicU64; BUCKET_COUNT],
    duration_count: AtomicU64,
    duration_sum_micros: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub analyses_total: u64,
    pub errors_total: u64,
    pub duration_count: u64,
    pub duration_sum_secs: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            analyses_total: AtomicU64::new(0),
            errors_total: AtomicU64::new(0),
            duration_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            duration_count: AtomicU64::new(0),
            duration_sum_micros: AtomicU64::new(0),
        }
    }

    pub fn record_analysis(&self) {
        self.analyses_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds one observation to the duration histogram
    pub fn observe_duration(&self, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        for (bound, bucket) in DURATION_BUCKETS.iter().zip(&self.duration_buckets) {
            if secs <= *bound {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.duration_count.fetch_add(1, Ordering::Relaxed);
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.duration_sum_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            analyses_total: self.analyses_total.load(Ordering::Relaxed),
            errors_total: self.errors_total.load(Ordering::Relaxed),
            duration_count: self.duration_count.load(Ordering::Relaxed),
            duration_sum_secs: self.duration_sum_micros.load(Ordering::Relaxed) as f64
                / 1_000_000.0,
        }
    }

    /// Renders the Prometheus text exposition format
    pub fn render(&self) -> String {
        let snapshot = self.snapshot();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "# HELP total_analysis The total number of URL analyses performed"
        );
        let _ = writeln!(out, "# TYPE total_analysis counter");
        let _ = writeln!(out, "total_analysis {}", snapshot.analyses_total);
        out.push('\n');

        let _ = writeln!(
            out,
            "# HELP analysis_errors_total The total number of URL analysis errors"
        );
        let _ = writeln!(out, "# TYPE analysis_errors_total counter");
        let _ = writeln!(out, "analysis_errors_total {}", snapshot.errors_total);
        out.push('\n');

        let _ = writeln!(
            out,
            "# HELP analysis_duration_seconds Time taken to analyze URLs"
        );
        let _ = writeln!(out, "# TYPE analysis_duration_seconds histogram");
        for (bound, bucket) in DURATION_BUCKETS.iter().zip(&self.duration_buckets) {
            let _ = writeln!(
                out,
                "analysis_duration_seconds_bucket{{le=\"{}\"}} {}",
                bound,
                bucket.load(Ordering::Relaxed)
            );
        }
        let _ = writeln!(
            out,
            "analysis_duration_seconds_bucket{{le=\"+Inf\"}} {}",
            snapshot.duration_count
        );
        let _ = writeln!(
            out,
            "analysis_duration_seconds_sum {}",
            snapshot.duration_sum_secs
        );
        let _ = writeln!(
            out,
            "analysis_duration_seconds_count {}",
            snapshot.duration_count
        );

        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
