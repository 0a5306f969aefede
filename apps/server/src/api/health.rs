use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::{main_lib::AppState, metrics::render_metrics};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Ready when the upstream answers a probe quote.
async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.market_data.is_ready().await {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        tracing::warn!("Readiness probe failed: upstream unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready" })),
        )
    }
}

async fn prometheus_metrics() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        render_metrics().unwrap_or_default(),
    )
}

/// Probe and scrape endpoints. Never behind the API key.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/metrics", get(prometheus_metrics))
}
