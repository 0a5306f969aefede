use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use yfproxy_core::{MarketDataService, MarketDataServiceTrait, PrometheusRecorder};
use yfproxy_market_data::{MarketDataProvider, YahooProvider};

pub struct AppState {
    pub market_data: Arc<dyn MarketDataServiceTrait>,
    /// `Some` when requests must carry `X-API-Key`.
    pub api_key: Option<String>,
    pub max_bulk_symbols: usize,
    pub news_max_items: usize,
}

pub fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(level.to_ascii_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = YahooProvider::new(config.retry.clone())?;
    tracing::info!(
        "Upstream retries: {} (timeout {:?} per attempt)",
        config.retry.max_retries,
        config.retry.attempt_timeout
    );
    Ok(build_state_with_provider(config, Arc::new(provider)))
}

/// Wire the caching layer around any provider. Used directly by tests.
pub fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> Arc<AppState> {
    let service = MarketDataService::new(provider, &config.core, Arc::new(PrometheusRecorder));
    if config.api_key.is_some() {
        tracing::info!("API key authentication enabled");
    }

    Arc::new(AppState {
        market_data: Arc::new(service),
        api_key: config.api_key.clone(),
        max_bulk_symbols: config.max_bulk_symbols,
        news_max_items: config.news_max_items,
    })
}
