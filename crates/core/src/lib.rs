//! yfproxy Core - request-scoped caching and concurrency control.
//!
//! Sits between the HTTP routes and the upstream market data provider:
//! per-category TTL caches, single-flight coalescing of duplicate requests,
//! a shared bound on upstream concurrency and order-preserving bulk fan-out.
//! The upstream itself is reached through the `MarketDataProvider` trait from
//! `yfproxy-market-data`.

pub mod cache;
pub mod concurrency;
pub mod errors;
pub mod fetcher;
pub mod market_data;
pub mod metrics;
pub mod settings;

pub use cache::{normalize_symbol, CacheKey, TtlCache};
pub use concurrency::{fan_out, ConcurrencyError, ConcurrencyLimiter, SingleFlight};
pub use fetcher::CachedFetcher;
pub use market_data::{MarketDataService, MarketDataServiceTrait};
pub use metrics::{CacheResult, MetricsRecorder, NoopRecorder, PrometheusRecorder, UpstreamOutcome};
pub use settings::{CacheSettings, CoreSettings};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
