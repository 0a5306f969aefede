use std::sync::Arc;

use axum::{http::HeaderValue, middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    auth::require_api_key, config::Config, main_lib::AppState, metrics::track_http_metrics,
};

mod earnings;
mod health;
mod historical;
mod info;
mod news;
pub mod quote;
mod snapshot;
mod splits;
pub mod validation;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let data = Router::new()
        .merge(quote::router())
        .merge(historical::router())
        .merge(info::router())
        .merge(snapshot::router())
        .merge(earnings::router())
        .merge(splits::router())
        .merge(news::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let router = Router::new()
        .merge(health::router())
        .merge(data)
        .route_layer(middleware::from_fn(track_http_metrics))
        .with_state(state)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        router.layer(cors_layer(config))
    } else {
        router
    }
}
