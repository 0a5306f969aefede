use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use yfproxy_market_data::{
    EarningsFrequency, HistoryRange, MarketDataError, MarketDataProvider, NewsTab, StockSplit,
};

use super::model::{
    EarningsResponse, HistoricalResponse, InfoResponse, NewsResponse, QuoteResponse,
    SnapshotResponse,
};
use crate::cache::{normalize_symbol, CacheKey};
use crate::concurrency::{fan_out, ConcurrencyLimiter};
use crate::errors::Result;
use crate::fetcher::CachedFetcher;
use crate::metrics::MetricsRecorder;
use crate::settings::CoreSettings;

const QUOTE: &str = "quote";
const INFO: &str = "info";
const HISTORY: &str = "history";
const EARNINGS: &str = "earnings";
const SPLITS: &str = "splits";
const NEWS: &str = "news";

#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<QuoteResponse>;
    /// One outcome per input symbol, in input order. Never fails as a whole.
    async fn get_quotes(&self, symbols: &[String]) -> Vec<(String, Result<QuoteResponse>)>;
    async fn get_info(&self, symbol: &str) -> Result<InfoResponse>;
    async fn get_history(&self, symbol: &str, range: &HistoryRange) -> Result<HistoricalResponse>;
    async fn get_earnings(
        &self,
        symbol: &str,
        frequency: EarningsFrequency,
    ) -> Result<EarningsResponse>;
    async fn get_splits(&self, symbol: &str) -> Result<Vec<StockSplit>>;
    /// Up to `count` articles from the `tab` stream.
    async fn get_news(&self, symbol: &str, tab: NewsTab, count: usize) -> Result<NewsResponse>;
    /// Cached info and an uncached quote, fetched concurrently. Either failure
    /// fails the snapshot.
    async fn get_snapshot(&self, symbol: &str) -> Result<SnapshotResponse>;
    async fn is_ready(&self) -> bool;
}

pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    limiter: ConcurrencyLimiter,
    quotes: CachedFetcher<QuoteResponse>,
    info: CachedFetcher<InfoResponse>,
    history: CachedFetcher<HistoricalResponse>,
    earnings: CachedFetcher<EarningsResponse>,
    splits: CachedFetcher<Vec<StockSplit>>,
    news: CachedFetcher<NewsResponse>,
}

impl MarketDataService {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        settings: &CoreSettings,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        let limiter = ConcurrencyLimiter::new(settings.max_concurrency);
        info!(
            "Market data service using provider {} with upstream concurrency {}",
            provider.id(),
            limiter.capacity()
        );

        Self {
            quotes: CachedFetcher::new(QUOTE, settings.quote, limiter.clone(), metrics.clone()),
            info: CachedFetcher::new(INFO, settings.info, limiter.clone(), metrics.clone()),
            history: CachedFetcher::new(HISTORY, settings.history, limiter.clone(), metrics.clone()),
            earnings: CachedFetcher::new(
                EARNINGS,
                settings.earnings,
                limiter.clone(),
                metrics.clone(),
            ),
            splits: CachedFetcher::new(SPLITS, settings.splits, limiter.clone(), metrics.clone()),
            news: CachedFetcher::new(NEWS, settings.news, limiter.clone(), metrics),
            provider,
            limiter,
        }
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn get_quote(&self, symbol: &str) -> Result<QuoteResponse> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::new(QUOTE, &symbol);
        let provider = Arc::clone(&self.provider);
        self.quotes
            .get_or_fetch(key, move || async move {
                provider
                    .get_latest_quote(&symbol)
                    .await
                    .map(QuoteResponse::from)
            })
            .await
    }

    async fn get_quotes(&self, symbols: &[String]) -> Vec<(String, Result<QuoteResponse>)> {
        let symbols: Vec<String> = symbols.iter().map(|s| normalize_symbol(s)).collect();
        debug!("Bulk quote lookup for {} symbols", symbols.len());
        fan_out(symbols, |symbol: String| async move {
            self.get_quote(&symbol).await
        })
        .await
    }

    async fn get_info(&self, symbol: &str) -> Result<InfoResponse> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::new(INFO, &symbol);
        let provider = Arc::clone(&self.provider);
        self.info
            .get_or_fetch(key, move || async move {
                let profile = provider.get_profile(&symbol).await?;
                Ok::<_, MarketDataError>(InfoResponse::from_profile(symbol, profile))
            })
            .await
    }

    async fn get_history(&self, symbol: &str, range: &HistoryRange) -> Result<HistoricalResponse> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::with_params(
            HISTORY,
            &symbol,
            [
                ("start", range.start.to_string()),
                ("end", range.end.to_string()),
                ("interval", range.interval.to_string()),
            ],
        );
        let provider = Arc::clone(&self.provider);
        let range = range.clone();
        self.history
            .get_or_fetch(key, move || async move {
                let bars = provider.get_historical_bars(&symbol, &range).await?;
                if bars.is_empty() {
                    return Err(MarketDataError::NoData(symbol));
                }
                Ok(HistoricalResponse::from_bars(symbol, bars))
            })
            .await
    }

    async fn get_earnings(
        &self,
        symbol: &str,
        frequency: EarningsFrequency,
    ) -> Result<EarningsResponse> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::with_params(EARNINGS, &symbol, [("frequency", frequency)]);
        let provider = Arc::clone(&self.provider);
        self.earnings
            .get_or_fetch(key, move || async move {
                let report = provider.get_earnings(&symbol, frequency).await?;
                if report.rows.is_empty() {
                    return Err(MarketDataError::NoData(format!(
                        "{} ({} earnings)",
                        symbol, frequency
                    )));
                }
                Ok(EarningsResponse::from_report(symbol, frequency, report))
            })
            .await
    }

    async fn get_splits(&self, symbol: &str) -> Result<Vec<StockSplit>> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::new(SPLITS, &symbol);
        let provider = Arc::clone(&self.provider);
        self.splits
            .get_or_fetch(key, move || async move { provider.get_splits(&symbol).await })
            .await
    }

    async fn get_news(&self, symbol: &str, tab: NewsTab, count: usize) -> Result<NewsResponse> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::with_params(
            NEWS,
            &symbol,
            [("tab", tab.to_string()), ("count", count.to_string())],
        );
        let provider = Arc::clone(&self.provider);
        self.news
            .get_or_fetch(key, move || async move {
                let news = provider.get_news(&symbol, tab, count).await?;
                if news.is_empty() {
                    return Err(MarketDataError::NoData(format!("{} (news)", symbol)));
                }
                Ok(NewsResponse { news })
            })
            .await
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<SnapshotResponse> {
        let symbol = normalize_symbol(symbol);
        let key = CacheKey::new(QUOTE, &symbol);
        let provider = &self.provider;
        let ticker = symbol.as_str();
        let fresh_quote = self.quotes.fetch_uncached(&key, move || async move {
            provider
                .get_latest_quote(ticker)
                .await
                .map(QuoteResponse::from)
        });
        let (info, quote) = futures::try_join!(self.get_info(&symbol), fresh_quote)?;
        Ok(SnapshotResponse::new(symbol, info, quote))
    }

    async fn is_ready(&self) -> bool {
        self.provider.ping().await
    }
}
