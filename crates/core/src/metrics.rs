//! Cache and upstream metrics.
//!
//! The caching layer reports through [`MetricsRecorder`] so it never depends on
//! a particular exporter. [`PrometheusRecorder`] forwards to the `metrics`
//! facade; whatever recorder the host installed (Prometheus in the server)
//! aggregates the values.

use std::fmt;
use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const CACHE_HITS_TOTAL: &str = "cache_hits_total";
    pub const CACHE_MISSES_TOTAL: &str = "cache_misses_total";
    pub const CACHE_PUTS_TOTAL: &str = "cache_puts_total";
    pub const CACHE_EVICTIONS_TOTAL: &str = "cache_evictions_total";
    pub const CACHE_EXPIRATIONS_TOTAL: &str = "cache_expirations_total";
    pub const CACHE_LENGTH: &str = "cache_length";
    pub const UPSTREAM_REQUESTS_TOTAL: &str = "upstream_requests_total";
    pub const UPSTREAM_REQUEST_DURATION_SECONDS: &str = "upstream_request_duration_seconds";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheResult {
    Hit,
    Miss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamOutcome {
    Success,
    Error,
    /// The provider gave up waiting on the upstream.
    Timeout,
}

impl UpstreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success => "success",
            UpstreamOutcome::Error => "error",
            UpstreamOutcome::Timeout => "timeout",
        }
    }
}

impl fmt::Display for UpstreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Passive observer of the caching layer.
///
/// Implementations must not block and must not panic; recording is fire and
/// forget and never affects the outcome of the operation being observed.
pub trait MetricsRecorder: Send + Sync {
    fn record_cache_result(&self, category: &str, result: CacheResult);

    /// A value was stored (new key or overwrite).
    fn record_cache_put(&self, category: &str);

    /// A live entry was dropped to make room for a new key.
    fn record_cache_eviction(&self, category: &str);

    /// An entry was found past its TTL and removed.
    fn record_cache_expiration(&self, category: &str);

    /// Current number of stored entries.
    fn record_cache_size(&self, category: &str, entries: usize);

    fn record_upstream_call(&self, category: &str, duration: Duration, outcome: UpstreamOutcome);
}

/// Forwards to the global `metrics` recorder.
///
/// When no recorder is installed the facade drops every value.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrometheusRecorder;

impl MetricsRecorder for PrometheusRecorder {
    fn record_cache_result(&self, category: &str, result: CacheResult) {
        let name = match result {
            CacheResult::Hit => names::CACHE_HITS_TOTAL,
            CacheResult::Miss => names::CACHE_MISSES_TOTAL,
        };
        counter!(name, "cache" => category.to_string()).increment(1);
    }

    fn record_cache_put(&self, category: &str) {
        counter!(names::CACHE_PUTS_TOTAL, "cache" => category.to_string()).increment(1);
    }

    fn record_cache_eviction(&self, category: &str) {
        counter!(names::CACHE_EVICTIONS_TOTAL, "cache" => category.to_string()).increment(1);
    }

    fn record_cache_expiration(&self, category: &str) {
        counter!(names::CACHE_EXPIRATIONS_TOTAL, "cache" => category.to_string()).increment(1);
    }

    fn record_cache_size(&self, category: &str, entries: usize) {
        gauge!(names::CACHE_LENGTH, "cache" => category.to_string()).set(entries as f64);
    }

    fn record_upstream_call(&self, category: &str, duration: Duration, outcome: UpstreamOutcome) {
        counter!(
            names::UPSTREAM_REQUESTS_TOTAL,
            "operation" => category.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);

        histogram!(
            names::UPSTREAM_REQUEST_DURATION_SECONDS,
            "operation" => category.to_string()
        )
        .record(duration.as_secs_f64());
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRecorder;

impl MetricsRecorder for NoopRecorder {
    fn record_cache_result(&self, _category: &str, _result: CacheResult) {}

    fn record_cache_put(&self, _category: &str) {}

    fn record_cache_eviction(&self, _category: &str) {}

    fn record_cache_expiration(&self, _category: &str) {}

    fn record_cache_size(&self, _category: &str, _entries: usize) {}

    fn record_upstream_call(&self, _category: &str, _duration: Duration, _outcome: UpstreamOutcome) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_installed_recorder_is_harmless() {
        let recorder = PrometheusRecorder;
        recorder.record_cache_result("quote", CacheResult::Hit);
        recorder.record_cache_result("quote", CacheResult::Miss);
        recorder.record_cache_put("quote");
        recorder.record_cache_eviction("quote");
        recorder.record_cache_expiration("quote");
        recorder.record_cache_size("quote", 3);
        recorder.record_upstream_call("quote", Duration::from_secs(30), UpstreamOutcome::Timeout);
        recorder.record_upstream_call("quote", Duration::from_millis(12), UpstreamOutcome::Error);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(UpstreamOutcome::Success.to_string(), "success");
        assert_eq!(UpstreamOutcome::Error.as_str(), "error");
        assert_eq!(UpstreamOutcome::Timeout.to_string(), "timeout");
    }
}
