//! Prometheus exposition and HTTP request metrics.
//!
//! Cache and upstream series are emitted by `yfproxy_core::PrometheusRecorder`
//! through the same global recorder installed here.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static STARTED_AT: OnceLock<Instant> = OnceLock::new();

pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    pub const HTTP_INPROGRESS_REQUESTS: &str = "http_inprogress_requests";
    pub const HTTP_INPROGRESS_TOTAL: &str = "http_inprogress_total";
    pub const PROCESS_UPTIME_SECONDS: &str = "process_uptime_seconds";
}

/// Install the Prometheus recorder. Returns `false` if it was already installed
/// or could not be installed.
pub fn init_metrics() -> bool {
    STARTED_AT.get_or_init(Instant::now);
    if PROMETHEUS_HANDLE.get().is_some() {
        tracing::debug!("Prometheus metrics already initialized");
        return false;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROMETHEUS_HANDLE.set(handle).is_err() {
                tracing::warn!("Failed to store Prometheus handle (already set)");
                return false;
            }
            tracing::info!("Prometheus metrics initialized");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Prometheus recorder");
            false
        }
    }
}

/// Render all metrics in Prometheus text format, `None` before `init_metrics`.
pub fn render_metrics() -> Option<String> {
    let handle = PROMETHEUS_HANDLE.get()?;
    record_uptime();
    Some(handle.render())
}

/// Seconds since `init_metrics`, refreshed on every scrape.
pub fn record_uptime() {
    let started = *STARTED_AT.get_or_init(Instant::now);
    gauge!(names::PROCESS_UPTIME_SECONDS).set(started.elapsed().as_secs_f64());
}

/// Counts a request as in progress until dropped, so cancelled and timed out
/// requests are released too.
struct InProgress {
    method: String,
    path: String,
}

impl InProgress {
    fn start(method: &str, path: &str) -> Self {
        gauge!(names::HTTP_INPROGRESS_TOTAL).increment(1.0);
        gauge!(
            names::HTTP_INPROGRESS_REQUESTS,
            "method" => method.to_string(),
            "path" => path.to_string()
        )
        .increment(1.0);
        Self {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

impl Drop for InProgress {
    fn drop(&mut self) {
        gauge!(names::HTTP_INPROGRESS_TOTAL).decrement(1.0);
        gauge!(
            names::HTTP_INPROGRESS_REQUESTS,
            "method" => self.method.clone(),
            "path" => self.path.clone()
        )
        .decrement(1.0);
    }
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    counter!(
        names::HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records every request under its route template (`/quote/{symbol}`), keeping
/// label cardinality bounded. Unmatched requests are grouped as `unmatched`.
pub async fn track_http_metrics(request: Request<Body>, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();

    let in_progress = InProgress::start(&method, &path);
    let started = Instant::now();
    let response = next.run(request).await;
    record_http_request(&method, &path, response.status().as_u16(), started.elapsed());
    drop(in_progress);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_with_local_recorder(f: impl FnOnce()) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, f);
        handle.render()
    }

    #[test]
    fn test_in_progress_gauges_track_live_requests() {
        let rendered = render_with_local_recorder(|| {
            let _first = InProgress::start("GET", "/quote/{symbol}");
            let second = InProgress::start("GET", "/quote/{symbol}");
            drop(second);
        });

        assert!(rendered.contains("http_inprogress_total 1"), "{}", rendered);
        let per_route = rendered
            .lines()
            .find(|line| line.starts_with("http_inprogress_requests{"))
            .unwrap();
        assert!(per_route.contains(r#"path="/quote/{symbol}""#), "{}", per_route);
        assert!(per_route.ends_with(" 1"), "{}", per_route);
    }

    #[test]
    fn test_in_progress_gauges_return_to_zero() {
        let rendered = render_with_local_recorder(|| {
            drop(InProgress::start("GET", "/health"));
        });
        assert!(rendered.contains("http_inprogress_total 0"), "{}", rendered);
    }

    #[test]
    fn test_uptime_gauge_is_exported() {
        let rendered = render_with_local_recorder(record_uptime);
        assert!(rendered.contains("process_uptime_seconds"), "{}", rendered);
    }
}
