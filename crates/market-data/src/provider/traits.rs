//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{
    AssetProfile, EarningsFrequency, EarningsReport, HistoricalBar, HistoryRange, NewsArticle,
    NewsTab, Quote, StockSplit,
};

/// Symbol used by the default readiness probe.
pub const PING_SYMBOL: &str = "AAPL";

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// Symbols are passed already validated and uppercased.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use yfproxy_market_data::{MarketDataError, MarketDataProvider, Quote};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
///         // ...
///     }
///
///     // ... remaining required methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO".
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;

    /// Fetch company/asset profile information.
    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError>;

    /// Fetch OHLCV bars for the inclusive date range.
    ///
    /// Bars should be ordered by date ascending. An empty range is reported as
    /// `MarketDataError::NoData`, not as an empty vector.
    async fn get_historical_bars(
        &self,
        symbol: &str,
        range: &HistoryRange,
    ) -> Result<Vec<HistoricalBar>, MarketDataError>;

    /// Fetch earnings rows for the given frequency.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_earnings(
        &self,
        symbol: &str,
        frequency: EarningsFrequency,
    ) -> Result<EarningsReport, MarketDataError> {
        let _ = (symbol, frequency);
        Err(MarketDataError::NotSupported {
            operation: "earnings".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch the full split history, oldest first.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_splits(&self, symbol: &str) -> Result<Vec<StockSplit>, MarketDataError> {
        let _ = symbol;
        Err(MarketDataError::NotSupported {
            operation: "splits".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Fetch up to `count` of the most recent articles from the `tab` stream.
    ///
    /// Default implementation returns `NotSupported`.
    async fn get_news(
        &self,
        symbol: &str,
        tab: NewsTab,
        count: usize,
    ) -> Result<Vec<NewsArticle>, MarketDataError> {
        let _ = (symbol, tab, count);
        Err(MarketDataError::NotSupported {
            operation: "news".to_string(),
            provider: self.id().to_string(),
        })
    }

    /// Check whether the upstream is reachable.
    ///
    /// The default probes a well-known symbol and treats any error as "not ready".
    async fn ping(&self) -> bool {
        self.get_latest_quote(PING_SYMBOL).await.is_ok()
    }
}
