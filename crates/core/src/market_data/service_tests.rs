//! Tests for MarketDataService caching and concurrency behavior.
//!
//! # Critical Contract Points
//!
//! 1. Coalescing: concurrent requests for one key reach the provider once
//! 2. Expiry: a cached value is served until its TTL elapses, then refetched
//! 3. Failures: delivered to every waiter, never cached
//! 4. Bulk: outcomes keep input order and fail independently
//! 5. Limiter: provider concurrency never exceeds the configured budget

#[cfg(test)]
mod tests {
    use crate::market_data::{MarketDataService, MarketDataServiceTrait};
    use crate::metrics::NoopRecorder;
    use crate::settings::{CacheSettings, CoreSettings};
    use crate::Error;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use yfproxy_market_data::{
        AssetProfile, EarningsFrequency, EarningsReport, EarningsRow, HistoricalBar,
        HistoryRange, Interval, MarketDataError, MarketDataProvider, NewsArticle, NewsContent,
        NewsTab, Quote, StockSplit,
    };

    // =========================================================================
    // Mock provider
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockProvider {
        latency: Duration,
        prices: Arc<Mutex<HashMap<String, Decimal>>>,
        failing: Arc<Mutex<HashSet<String>>>,
        calls: Arc<Mutex<Vec<String>>>,
        active: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        ready: bool,
    }

    impl MockProvider {
        fn new(latency: Duration) -> Self {
            Self {
                latency,
                ready: true,
                ..Default::default()
            }
        }

        fn with_price(self, symbol: &str, price: Decimal) -> Self {
            self.prices.lock().unwrap().insert(symbol.to_string(), price);
            self
        }

        fn set_price(&self, symbol: &str, price: Decimal) {
            self.prices.lock().unwrap().insert(symbol.to_string(), price);
        }

        fn failing_for(self, symbol: &str) -> Self {
            self.failing.lock().unwrap().insert(symbol.to_string());
            self
        }

        fn recover(&self, symbol: &str) {
            self.failing.lock().unwrap().remove(symbol);
        }

        fn call_count(&self, call: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.as_str() == call)
                .count()
        }

        fn peak_concurrency(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }

        /// Record the call, simulate latency and track concurrency.
        async fn enter(&self, call: String) -> Result<(), MarketDataError> {
            let symbol = call.split(':').nth(1).unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(call);

            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if self.failing.lock().unwrap().contains(&symbol) {
                return Err(MarketDataError::SymbolNotFound(symbol));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
            self.enter(format!("quote:{}", symbol)).await?;
            let price = self
                .prices
                .lock()
                .unwrap()
                .get(symbol)
                .copied()
                .unwrap_or(dec!(100));
            let mut quote = Quote::new(symbol, Utc::now(), price, "MOCK");
            quote.previous_close = Some(price - dec!(1));
            quote.volume = Some(1_000);
            Ok(quote)
        }

        async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
            self.enter(format!("profile:{}", symbol)).await?;
            Ok(AssetProfile::with_name(format!("{} Inc.", symbol))
                .sector("Technology")
                .currency("USD"))
        }

        async fn get_historical_bars(
            &self,
            symbol: &str,
            range: &HistoryRange,
        ) -> Result<Vec<HistoricalBar>, MarketDataError> {
            self.enter(format!("history:{}", symbol)).await?;
            let bar = |date: NaiveDate, close: Decimal| HistoricalBar {
                date,
                timestamp: Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()),
                open: close,
                high: close,
                low: close,
                close,
                volume: Some(10),
            };
            Ok(vec![bar(range.start, dec!(1)), bar(range.end, dec!(2))])
        }

        async fn get_earnings(
            &self,
            symbol: &str,
            frequency: EarningsFrequency,
        ) -> Result<EarningsReport, MarketDataError> {
            self.enter(format!("earnings:{}", symbol)).await?;
            if frequency == EarningsFrequency::Annual {
                return Ok(EarningsReport::default());
            }
            let row = |m: u32, eps: Option<f64>| EarningsRow {
                earnings_date: NaiveDate::from_ymd_opt(2024, m, 25).unwrap(),
                reported_eps: eps,
                estimated_eps: Some(1.0),
                surprise: None,
                surprise_percent: None,
            };
            Ok(EarningsReport {
                rows: vec![row(1, Some(2.1)), row(4, Some(1.5)), row(7, None)],
                next_earnings_date: NaiveDate::from_ymd_opt(2024, 10, 30),
            })
        }

        async fn get_splits(&self, symbol: &str) -> Result<Vec<StockSplit>, MarketDataError> {
            self.enter(format!("splits:{}", symbol)).await?;
            Ok(vec![StockSplit {
                date: NaiveDate::from_ymd_opt(2020, 8, 31).unwrap(),
                ratio: 4.0,
            }])
        }

        async fn get_news(
            &self,
            symbol: &str,
            tab: NewsTab,
            count: usize,
        ) -> Result<Vec<NewsArticle>, MarketDataError> {
            self.enter(format!("news:{}:{}", symbol, tab)).await?;
            if symbol == "QUIET" {
                return Ok(Vec::new());
            }
            Ok((0..count)
                .map(|i| NewsArticle {
                    id: format!("{}-{}-{}", symbol, tab, i),
                    content: NewsContent {
                        title: Some(format!("{} story {}", symbol, i)),
                        ..Default::default()
                    },
                })
                .collect())
        }

        async fn ping(&self) -> bool {
            self.ready
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn settings(max_concurrency: usize) -> CoreSettings {
        CoreSettings {
            max_concurrency,
            ..Default::default()
        }
    }

    fn service(provider: &MockProvider, settings: CoreSettings) -> Arc<MarketDataService> {
        Arc::new(MarketDataService::new(
            Arc::new(provider.clone()),
            &settings,
            Arc::new(NoopRecorder),
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================================
    // Coalescing and expiry
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_staggered_requests_share_one_call_and_refresh_after_ttl() {
        let provider = MockProvider::new(Duration::from_secs(3)).with_price("AAPL", dec!(190));
        let service = service(&provider, settings(10));

        let first = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get_quote("AAPL").await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        let second = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get_quote("aapl").await })
        };

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.current_price, dec!(190));
        assert_eq!(provider.call_count("quote:AAPL"), 1);

        // Still fresh
        provider.set_price("AAPL", dec!(195));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(service.get_quote("AAPL").await.unwrap().current_price, dec!(190));
        assert_eq!(provider.call_count("quote:AAPL"), 1);

        tokio::time::sleep(Duration::from_secs(35)).await;
        let third = service.get_quote("AAPL").await.unwrap();
        assert_eq!(third.current_price, dec!(195));
        assert_eq!(provider.call_count("quote:AAPL"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_many_concurrent_callers_reach_provider_once() {
        let provider = MockProvider::new(Duration::from_millis(200));
        let service = service(&provider, settings(10));

        let tasks: Vec<_> = (0..25)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.get_info("MSFT").await })
            })
            .collect();

        for task in tasks {
            let info = task.await.unwrap().unwrap();
            assert_eq!(info.short_name.as_deref(), Some("MSFT Inc."));
        }
        assert_eq!(provider.call_count("profile:MSFT"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_category_always_goes_upstream() {
        let provider = MockProvider::new(Duration::ZERO);
        let mut settings = settings(10);
        settings.splits = CacheSettings::new(0, 256);
        let service = service(&provider, settings);

        service.get_splits("AAPL").await.unwrap();
        service.get_splits("AAPL").await.unwrap();
        assert_eq!(provider.call_count("splits:AAPL"), 2);
    }

    // =========================================================================
    // Failures
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_shared_and_not_cached() {
        let provider = MockProvider::new(Duration::from_millis(100)).failing_for("BAD");
        let service = service(&provider, settings(10));

        let (a, b) = tokio::join!(service.get_quote("BAD"), service.get_quote("BAD"));
        let expected = Err(Error::MarketData(MarketDataError::SymbolNotFound(
            "BAD".to_string(),
        )));
        assert_eq!(a, expected);
        assert_eq!(b, expected);
        assert_eq!(provider.call_count("quote:BAD"), 1);

        provider.recover("BAD");
        assert!(service.get_quote("BAD").await.is_ok());
        assert_eq!(provider.call_count("quote:BAD"), 2);
        assert_eq!(service.limiter().available(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_earnings_are_reported_as_no_data() {
        let provider = MockProvider::new(Duration::ZERO);
        let service = service(&provider, settings(10));

        let err = service
            .get_earnings("AAPL", EarningsFrequency::Annual)
            .await
            .unwrap_err();
        match err {
            Error::MarketData(e) => assert!(e.is_not_found()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // =========================================================================
    // Bulk fan-out and limiter
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_bulk_preserves_order_with_partial_failure() {
        let provider = MockProvider::new(Duration::from_millis(50))
            .with_price("A", dec!(1))
            .with_price("C", dec!(3))
            .failing_for("B");
        let service = service(&provider, settings(10));

        let symbols = vec!["a".to_string(), "B".to_string(), "c".to_string()];
        let results = service.get_quotes(&symbols).await;

        let order: Vec<&str> = results.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(results[0].1.as_ref().unwrap().current_price, dec!(1));
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap().current_price, dec!(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bulk_serves_cached_symbols_without_upstream() {
        let provider = MockProvider::new(Duration::from_millis(10));
        let service = service(&provider, settings(10));

        service.get_quote("AAPL").await.unwrap();
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let results = service.get_quotes(&symbols).await;

        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(provider.call_count("quote:AAPL"), 1);
        assert_eq!(provider.call_count("quote:MSFT"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_caps_upstream_concurrency() {
        let provider = MockProvider::new(Duration::from_millis(100));
        let service = service(&provider, settings(2));

        let symbols: Vec<String> = ["A", "B", "C", "D", "E"].iter().map(|s| s.to_string()).collect();
        let results = service.get_quotes(&symbols).await;

        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|(_, r)| r.is_ok()));
        assert_eq!(provider.peak_concurrency(), 2);
        assert_eq!(service.limiter().available(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_is_shared_across_categories() {
        let provider = MockProvider::new(Duration::from_millis(100));
        let service = service(&provider, settings(1));

        let range = HistoryRange::new(date(2024, 1, 1), date(2024, 1, 31), Interval::OneDay).unwrap();
        let (quote, info, history) = tokio::join!(
            service.get_quote("AAPL"),
            service.get_info("AAPL"),
            service.get_history("AAPL", &range),
        );

        assert!(quote.is_ok() && info.is_ok() && history.is_ok());
        assert_eq!(provider.peak_concurrency(), 1);
    }

    // =========================================================================
    // Per-operation keys
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_history_key_includes_range_and_interval() {
        let provider = MockProvider::new(Duration::ZERO);
        let service = service(&provider, settings(10));

        let daily = HistoryRange::new(date(2024, 1, 1), date(2024, 1, 31), Interval::OneDay).unwrap();
        let weekly = HistoryRange::new(date(2024, 1, 1), date(2024, 1, 31), Interval::OneWeek).unwrap();

        let response = service.get_history("AAPL", &daily).await.unwrap();
        service.get_history("aapl", &daily).await.unwrap();
        service.get_history("AAPL", &weekly).await.unwrap();

        assert_eq!(response.symbol, "AAPL");
        assert_eq!(response.prices.len(), 2);
        assert_eq!(provider.call_count("history:AAPL"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earnings_are_sorted_and_keyed_by_frequency() {
        let provider = MockProvider::new(Duration::ZERO);
        let service = service(&provider, settings(10));

        let earnings = service
            .get_earnings("msft", EarningsFrequency::Quarterly)
            .await
            .unwrap();
        assert_eq!(earnings.symbol, "MSFT");
        assert_eq!(earnings.rows[0].earnings_date, date(2024, 7, 25));
        assert_eq!(earnings.last_eps, Some(1.5));
        assert_eq!(earnings.next_earnings_date, Some(date(2024, 10, 30)));

        service
            .get_earnings("MSFT", EarningsFrequency::Quarterly)
            .await
            .unwrap();
        let _ = service.get_earnings("MSFT", EarningsFrequency::Annual).await;
        assert_eq!(provider.call_count("earnings:MSFT"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_combines_info_and_quote() {
        let provider = MockProvider::new(Duration::from_millis(10)).with_price("NVDA", dec!(120));
        let service = service(&provider, settings(10));

        let snapshot = service.get_snapshot("nvda").await.unwrap();
        assert_eq!(snapshot.symbol, "NVDA");
        assert_eq!(snapshot.current_price, Some(dec!(120)));
        assert_eq!(snapshot.currency.as_deref(), Some("USD"));
        assert_eq!(snapshot.info.short_name.as_deref(), Some("NVDA Inc."));

        // Info is now cached for /info as well
        service.get_info("NVDA").await.unwrap();
        assert_eq!(provider.call_count("profile:NVDA"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_quote_is_always_fresh() {
        let provider = MockProvider::new(Duration::from_millis(10)).with_price("NVDA", dec!(120));
        let service = service(&provider, settings(10));

        let quote = service.get_quote("NVDA").await.unwrap();
        assert_eq!(quote.current_price, dec!(120));

        provider.set_price("NVDA", dec!(130));
        let snapshot = service.get_snapshot("NVDA").await.unwrap();
        assert_eq!(snapshot.current_price, Some(dec!(130)));
        assert_eq!(snapshot.quote.current_price, dec!(130));
        assert_eq!(provider.call_count("quote:NVDA"), 2);

        // The fresh quote does not replace the cached one
        let cached = service.get_quote("NVDA").await.unwrap();
        assert_eq!(cached.current_price, dec!(120));
        assert_eq!(provider.call_count("quote:NVDA"), 2);

        // Info stays cached across snapshots
        service.get_snapshot("NVDA").await.unwrap();
        assert_eq!(provider.call_count("profile:NVDA"), 1);
        assert_eq!(provider.call_count("quote:NVDA"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_fails_when_either_part_fails() {
        let provider = MockProvider::new(Duration::ZERO).failing_for("GONE");
        let service = service(&provider, settings(10));

        assert!(service.get_snapshot("GONE").await.is_err());
    }

    #[tokio::test]
    async fn test_readiness_delegates_to_provider() {
        let ready = MockProvider::new(Duration::ZERO);
        assert!(service(&ready, settings(1)).is_ready().await);

        let mut down = MockProvider::new(Duration::ZERO);
        down.ready = false;
        assert!(!service(&down, settings(1)).is_ready().await);
    }

    // =========================================================================
    // News
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_news_is_cached_per_tab_and_count() {
        let provider = MockProvider::new(Duration::from_millis(10));
        let service = service(&provider, settings(10));

        let first = service.get_news("aapl", NewsTab::News, 3).await.unwrap();
        assert_eq!(first.news.len(), 3);
        assert_eq!(first.news[0].id, "AAPL-news-0");

        service.get_news("AAPL", NewsTab::News, 3).await.unwrap();
        assert_eq!(provider.call_count("news:AAPL:news"), 1);

        service.get_news("AAPL", NewsTab::News, 5).await.unwrap();
        assert_eq!(provider.call_count("news:AAPL:news"), 2);

        let releases = service
            .get_news("AAPL", NewsTab::PressReleases, 3)
            .await
            .unwrap();
        assert_eq!(releases.news[0].id, "AAPL-press-releases-0");
        assert_eq!(provider.call_count("news:AAPL:press-releases"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_news_expires_with_category_ttl() {
        let provider = MockProvider::new(Duration::ZERO);
        let settings = CoreSettings {
            news: CacheSettings::new(30, 16),
            ..Default::default()
        };
        let service = service(&provider, settings);

        service.get_news("MSFT", NewsTab::All, 2).await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        service.get_news("MSFT", NewsTab::All, 2).await.unwrap();
        assert_eq!(provider.call_count("news:MSFT:all"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_news_is_no_data_and_not_cached() {
        let provider = MockProvider::new(Duration::ZERO);
        let service = service(&provider, settings(10));

        let err = service.get_news("QUIET", NewsTab::News, 5).await.unwrap_err();
        assert!(matches!(err, Error::MarketData(MarketDataError::NoData(_))));

        let _ = service.get_news("QUIET", NewsTab::News, 5).await;
        assert_eq!(provider.call_count("news:QUIET:news"), 2);
    }
}
