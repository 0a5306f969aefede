//! yfproxy Market Data Crate
//!
//! Upstream client adapter for the proxy: a provider trait, the Yahoo Finance
//! implementation, provider-agnostic models and the error taxonomy.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  Caching layer   |  (yfproxy-core: cache, single-flight, limiter)
//! +------------------+
//!          |
//!          v
//! +----------------------+
//! | MarketDataProvider   |  (trait; opaque errors)
//! +----------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |   RetryPolicy    | --> |  YahooProvider   |  (timeout + backoff, then HTTP)
//! +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Latest quote for a symbol
//! - [`AssetProfile`] - Company profile and key statistics
//! - [`HistoricalBar`] / [`HistoryRange`] - OHLCV history
//! - [`EarningsReport`] - Earnings rows and the next earnings date
//! - [`StockSplit`] - Split events
//! - [`NewsArticle`] / [`NewsTab`] - News stream articles
//! - [`MarketDataError`] - Clonable upstream error

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{MarketDataError, RetryClass, RetryPolicy};

pub use models::{
    AssetProfile, EarningsFrequency, EarningsReport, EarningsRow, HistoricalBar, HistoryRange,
    Interval, NewsArticle, NewsContent, NewsTab, Quote, StockSplit,
};

pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
