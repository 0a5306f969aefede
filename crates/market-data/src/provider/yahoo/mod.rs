//! Yahoo Finance market data provider.
//!
//! Quotes, profiles and earnings come from the quoteSummary endpoint (crumb +
//! cookie authenticated). History goes through `yahoo_finance_api`, split
//! events are read from the chart endpoint and news from the ticker stream.
//! Every upstream call is wrapped in the provider's [`RetryPolicy`].

mod models;

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, TimeZone, Utc};
use log::{debug, warn};
use num_traits::FromPrimitive;
use reqwest::{header, StatusCode};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::{MarketDataError, RetryPolicy};
use crate::models::{
    AssetProfile, EarningsFrequency, EarningsReport, EarningsRow, HistoricalBar, HistoryRange,
    NewsArticle, NewsTab, Quote, StockSplit,
};
use crate::provider::traits::PING_SYMBOL;
use crate::provider::MarketDataProvider;

use models::{
    raw, YahooCalendarEvents, YahooChartResponse, YahooEarningsHistory, YahooNewsResponse,
    YahooPriceData, YahooQuoteSummaryResponse, YahooQuoteSummaryResult,
};

const PROVIDER_ID: &str = "YAHOO";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const NEWS_URL: &str = "https://finance.yahoo.com/xhr/ncp";

const PRICE_MODULES: &str = "price";
const PROFILE_MODULES: &str = "price,summaryProfile,summaryDetail,defaultKeyStatistics";
const EARNINGS_MODULES: &str = "earningsHistory,calendarEvents";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
    crumb: RwLock<Option<CrumbData>>,
    retry: RetryPolicy,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider using `retry` for every upstream call.
    pub fn new(retry: RetryPolicy) -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| provider_error(format!(
            "Failed to initialize Yahoo connector: {}",
            e
        )))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| provider_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            connector,
            client,
            crumb: RwLock::new(None),
            retry,
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    fn cached_crumb(&self) -> Option<CrumbData> {
        self.crumb
            .read()
            .unwrap_or_else(|poisoned| {
                warn!("Yahoo crumb lock poisoned, recovering");
                poisoned.into_inner()
            })
            .clone()
    }

    fn store_crumb(&self, value: Option<CrumbData>) {
        let mut guard = self.crumb.write().unwrap_or_else(|poisoned| {
            warn!("Yahoo crumb lock poisoned, recovering");
            poisoned.into_inner()
        });
        *guard = value;
    }

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Some(crumb) = self.cached_crumb() {
            return Ok(crumb);
        }
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        debug!("Fetching new Yahoo crumb");

        // Step 1: Get cookie from fc.yahoo.com
        let response = self.client.get(COOKIE_URL).send().await?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get(CRUMB_URL)
            .header(header::COOKIE, &cookie)
            .send()
            .await?
            .text()
            .await?;

        if crumb.trim().is_empty() || crumb.contains('<') {
            return Err(provider_error("Yahoo returned an invalid crumb"));
        }

        let crumb_data = CrumbData { cookie, crumb };
        self.store_crumb(Some(crumb_data.clone()));
        Ok(crumb_data)
    }

    /// Map an HTTP status to an error. Auth failures drop the cached crumb.
    fn check_status(&self, status: StatusCode, symbol: &str) -> Result<(), MarketDataError> {
        match status {
            s if s.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.store_crumb(None);
                Err(provider_error("Yahoo authentication expired"))
            }
            StatusCode::NOT_FOUND => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            }),
            s if s.is_server_error() => {
                Err(MarketDataError::Network(format!("Yahoo returned {}", s)))
            }
            s => Err(provider_error(format!("Unexpected status {}", s))),
        }
    }

    // ========================================================================
    // Raw endpoint access (single attempt)
    // ========================================================================

    /// One quoteSummary call for `modules`.
    async fn quote_summary(
        &self,
        symbol: &str,
        modules: &str,
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}/{}?modules={}&crumb={}",
            QUOTE_SUMMARY_URL,
            encode(symbol),
            modules,
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;
        self.check_status(response.status(), symbol)?;

        let data: YahooQuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| malformed(format!("Failed to parse quoteSummary response: {}", e)))?;

        if let Some(err) = data.quote_summary.error.as_ref() {
            debug!(
                "quoteSummary error for {}: {:?} {:?}",
                symbol, err.code, err.description
            );
        }

        data.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    /// Chart endpoint, used for split events.
    async fn chart_events(&self, symbol: &str) -> Result<YahooChartResponse, MarketDataError> {
        let url = format!(
            "{}/{}?range=max&interval=1mo&events=split",
            CHART_URL,
            encode(symbol)
        );
        let response = self.client.get(&url).send().await?;
        self.check_status(response.status(), symbol)?;
        response
            .json()
            .await
            .map_err(|e| malformed(format!("Failed to parse chart response: {}", e)))
    }

    /// One news stream call for `tab`.
    async fn news_stream(
        &self,
        symbol: &str,
        tab: NewsTab,
        count: usize,
    ) -> Result<YahooNewsResponse, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}?queryRef={}&serviceKey=ncp_fin&crumb={}",
            NEWS_URL,
            news_query_ref(tab),
            encode(&crumb.crumb)
        );
        let body = serde_json::json!({
            "serviceConfig": { "snippetCount": count, "s": [symbol] }
        });

        let response = self
            .client
            .post(&url)
            .header(header::COOKIE, &crumb.cookie)
            .json(&body)
            .send()
            .await?;
        self.check_status(response.status(), symbol)?;

        response
            .json()
            .await
            .map_err(|e| malformed(format!("Failed to parse news response: {}", e)))
    }

    /// Latest bar from the chart API. Used when quoteSummary is unavailable.
    async fn chart_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| map_connector_error(symbol, e))?;

        let bar = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        let timestamp = Utc
            .timestamp_opt(bar.timestamp as i64, 0)
            .single()
            .ok_or_else(|| malformed(format!("Invalid timestamp: {}", bar.timestamp)))?;
        let price = Decimal::from_f64_retain(bar.close)
            .ok_or_else(|| malformed(format!("Invalid close price {}", bar.close)))?;

        let mut quote = Quote::new(symbol, timestamp, price, PROVIDER_ID);
        quote.open = Decimal::from_f64_retain(bar.open);
        quote.high = Decimal::from_f64_retain(bar.high);
        quote.low = Decimal::from_f64_retain(bar.low);
        quote.volume = Some(bar.volume);
        Ok(quote)
    }

    async fn history(
        &self,
        symbol: &str,
        range: &HistoryRange,
    ) -> Result<Vec<HistoricalBar>, MarketDataError> {
        let start = date_to_offset_datetime(range.start);
        // Yahoo treats `period2` as exclusive
        let end = date_to_offset_datetime(range.end.checked_add_days(Days::new(1)).unwrap_or(range.end));

        let response = self
            .connector
            .get_quote_history_interval(symbol, start, end, range.interval.as_str())
            .await
            .map_err(|e| map_connector_error(symbol, e))?;

        let bars = match response.quotes() {
            Ok(quotes) => quotes,
            Err(yahoo::YahooError::NoQuotes) => Vec::new(),
            Err(e) => return Err(provider_error(e.to_string())),
        };

        let bars: Vec<HistoricalBar> = bars
            .into_iter()
            .filter_map(|q| match yahoo_quote_to_bar(&q) {
                Ok(bar) => Some(bar),
                Err(e) => {
                    warn!("Skipping bar due to conversion error: {}", e);
                    None
                }
            })
            .collect();

        if bars.is_empty() {
            warn!(
                "No historical bars returned for '{}' between {} and {}",
                symbol, range.start, range.end
            );
            return Err(MarketDataError::NoData(symbol.to_string()));
        }
        Ok(bars)
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        let primary = self
            .retry
            .run(PROVIDER_ID, "quote", move || async move {
                let result = self.quote_summary(symbol, PRICE_MODULES).await?;
                let price = result
                    .price
                    .as_ref()
                    .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;
                map_price_to_quote(symbol, price)
            })
            .await;

        match primary {
            Ok(quote) => Ok(quote),
            Err(e) if e.is_not_found() => Err(e),
            Err(e) => {
                debug!(
                    "quoteSummary quote failed for {}: {}, trying chart fallback",
                    symbol, e
                );
                self.retry
                    .run(PROVIDER_ID, "quote_chart", move || self.chart_quote(symbol))
                    .await
            }
        }
    }

    async fn get_profile(&self, symbol: &str) -> Result<AssetProfile, MarketDataError> {
        debug!("Fetching profile for {} from Yahoo", symbol);

        let result = self
            .retry
            .run(PROVIDER_ID, "info", move || {
                self.quote_summary(symbol, PROFILE_MODULES)
            })
            .await?;

        let profile = map_summary_to_profile(&result);
        if profile.is_empty() {
            return Err(MarketDataError::NoData(symbol.to_string()));
        }
        Ok(profile)
    }

    async fn get_historical_bars(
        &self,
        symbol: &str,
        range: &HistoryRange,
    ) -> Result<Vec<HistoricalBar>, MarketDataError> {
        debug!(
            "Fetching {} history for {} from {} to {} from Yahoo",
            range.interval, symbol, range.start, range.end
        );

        self.retry
            .run(PROVIDER_ID, "history", move || self.history(symbol, range))
            .await
    }

    async fn get_earnings(
        &self,
        symbol: &str,
        frequency: EarningsFrequency,
    ) -> Result<EarningsReport, MarketDataError> {
        debug!("Fetching {} earnings for {} from Yahoo", frequency, symbol);

        let result = self
            .retry
            .run(PROVIDER_ID, "earnings", move || {
                self.quote_summary(symbol, EARNINGS_MODULES)
            })
            .await?;

        let quarterly = result
            .earnings_history
            .as_ref()
            .map(map_earnings_history)
            .unwrap_or_default();
        let rows = match frequency {
            EarningsFrequency::Quarterly => quarterly,
            EarningsFrequency::Annual => annualize(&quarterly),
        };

        if rows.is_empty() {
            return Err(MarketDataError::NoData(format!(
                "{} ({} earnings)",
                symbol, frequency
            )));
        }

        Ok(EarningsReport {
            rows,
            next_earnings_date: next_earnings_date(result.calendar_events.as_ref()),
        })
    }

    async fn get_splits(&self, symbol: &str) -> Result<Vec<StockSplit>, MarketDataError> {
        debug!("Fetching splits for {} from Yahoo", symbol);

        let response = self
            .retry
            .run(PROVIDER_ID, "splits", move || self.chart_events(symbol))
            .await?;
        map_splits(symbol, response)
    }

    async fn get_news(
        &self,
        symbol: &str,
        tab: NewsTab,
        count: usize,
    ) -> Result<Vec<NewsArticle>, MarketDataError> {
        debug!("Fetching {} {} items for {} from Yahoo", count, tab, symbol);

        let response = self
            .retry
            .run(PROVIDER_ID, "news", move || {
                self.news_stream(symbol, tab, count)
            })
            .await?;
        map_news(symbol, response, count)
    }

    async fn ping(&self) -> bool {
        // Single attempt so a readiness probe never sits in backoff
        let single = RetryPolicy::no_retry(self.retry.attempt_timeout);
        match single
            .run(PROVIDER_ID, "ping", || {
                self.quote_summary(PING_SYMBOL, PRICE_MODULES)
            })
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Yahoo readiness probe failed: {}", e);
                false
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn provider_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

fn malformed(message: impl Into<String>) -> MarketDataError {
    MarketDataError::MalformedResponse {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

fn map_connector_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
    if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
        MarketDataError::SymbolNotFound(symbol.to_string())
    } else {
        provider_error(e.to_string())
    }
}

fn date_to_offset_datetime(date: NaiveDate) -> OffsetDateTime {
    let ts = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();
    OffsetDateTime::from_unix_timestamp(ts).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn epoch_to_date(ts: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(ts, 0).single().map(|dt| dt.date_naive())
}

fn to_decimal(value: Option<f64>) -> Option<Decimal> {
    value.and_then(Decimal::from_f64_retain)
}

fn yahoo_quote_to_bar(q: &yahoo::Quote) -> Result<HistoricalBar, MarketDataError> {
    let timestamp = Utc
        .timestamp_opt(q.timestamp as i64, 0)
        .single()
        .ok_or_else(|| malformed(format!("Invalid timestamp: {}", q.timestamp)))?;
    let date = timestamp.date_naive();
    let price = |v: f64, field: &str| {
        Decimal::from_f64_retain(v)
            .ok_or_else(|| malformed(format!("Invalid {} {} on {}", field, v, date)))
    };
    Ok(HistoricalBar {
        date,
        timestamp,
        open: price(q.open, "open")?,
        high: price(q.high, "high")?,
        low: price(q.low, "low")?,
        close: price(q.close, "close")?,
        volume: Some(q.volume),
    })
}

/// Map the quoteSummary `price` module to a [`Quote`].
fn map_price_to_quote(symbol: &str, price: &YahooPriceData) -> Result<Quote, MarketDataError> {
    let current = to_decimal(raw(&price.regular_market_price))
        .ok_or_else(|| MarketDataError::NoData(symbol.to_string()))?;

    let timestamp = price
        .regular_market_time
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .unwrap_or_else(Utc::now);

    Ok(Quote {
        symbol: symbol.to_string(),
        timestamp,
        price: current,
        previous_close: to_decimal(raw(&price.regular_market_previous_close)),
        open: to_decimal(raw(&price.regular_market_open)),
        high: to_decimal(raw(&price.regular_market_day_high)),
        low: to_decimal(raw(&price.regular_market_day_low)),
        volume: raw(&price.regular_market_volume).and_then(u64::from_f64),
        currency: price.currency.clone(),
        source: PROVIDER_ID.to_string(),
    })
}

/// Map a quoteSummary result to [`AssetProfile`].
fn map_summary_to_profile(result: &YahooQuoteSummaryResult) -> AssetProfile {
    let price = result.price.as_ref();
    let summary = result.summary_profile.as_ref();
    let detail = result.summary_detail.as_ref();
    let stats = result.default_key_statistics.as_ref();

    AssetProfile {
        source: Some(PROVIDER_ID.to_string()),
        short_name: price.and_then(|p| p.short_name.clone()),
        long_name: price
            .and_then(|p| p.long_name.as_deref())
            .map(clean_long_name)
            .filter(|n| !n.is_empty()),
        exchange: price.and_then(|p| p.exchange.clone()),
        quote_type: price
            .and_then(|p| p.quote_type.as_ref())
            .map(|t| t.to_uppercase()),
        sector: summary
            .and_then(|s| s.sector.as_deref())
            .map(format_sector),
        industry: summary.and_then(|s| s.industry.clone()),
        country: summary.and_then(|s| s.country.clone()),
        website: summary.and_then(|s| s.website.clone()),
        description: summary
            .and_then(|s| s.long_business_summary.clone().or(s.description.clone())),
        address: summary.and_then(|s| s.address1.clone()),
        currency: price
            .and_then(|p| p.currency.clone())
            .or_else(|| detail.and_then(|d| d.currency.clone())),
        market_cap: detail.and_then(|d| raw(&d.market_cap)),
        shares_outstanding: stats.and_then(|s| raw(&s.shares_outstanding)),
        dividend_yield: detail.and_then(|d| raw(&d.dividend_yield)),
        week_52_high: detail.and_then(|d| raw(&d.fifty_two_week_high)),
        week_52_low: detail.and_then(|d| raw(&d.fifty_two_week_low)),
        current_price: price.and_then(|p| raw(&p.regular_market_price)),
        trailing_pe: detail.and_then(|d| raw(&d.trailing_pe)),
        beta: detail
            .and_then(|d| raw(&d.beta))
            .or_else(|| stats.and_then(|s| raw(&s.beta))),
    }
}

/// Quarterly rows from `earningsHistory`. Rows without a quarter date are dropped.
fn map_earnings_history(history: &YahooEarningsHistory) -> Vec<EarningsRow> {
    history
        .history
        .iter()
        .filter_map(|item| {
            let date = item
                .quarter
                .as_ref()
                .and_then(|q| q.raw)
                .and_then(epoch_to_date)?;
            Some(EarningsRow {
                earnings_date: date,
                reported_eps: raw(&item.eps_actual),
                estimated_eps: raw(&item.eps_estimate),
                surprise: raw(&item.eps_difference),
                surprise_percent: raw(&item.surprise_percent),
            })
        })
        .collect()
}

/// Roll quarterly rows up into calendar years, dated December 31st.
///
/// EPS values are summed over the quarters that report them. Surprise figures
/// are recomputed from the sums.
fn annualize(quarters: &[EarningsRow]) -> Vec<EarningsRow> {
    let mut years: BTreeMap<i32, Vec<&EarningsRow>> = BTreeMap::new();
    for row in quarters {
        years.entry(row.earnings_date.year()).or_default().push(row);
    }

    years
        .into_iter()
        .filter_map(|(year, rows)| {
            let sum = |pick: fn(&EarningsRow) -> Option<f64>| {
                rows.iter()
                    .filter_map(|r| pick(r))
                    .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
            };
            let reported = sum(|r| r.reported_eps);
            let estimated = sum(|r| r.estimated_eps);
            let surprise = reported.zip(estimated).map(|(r, e)| r - e);
            let surprise_percent = surprise
                .zip(estimated)
                .filter(|(_, e)| *e != 0.0)
                .map(|(s, e)| s / e.abs());
            Some(EarningsRow {
                earnings_date: NaiveDate::from_ymd_opt(year, 12, 31)?,
                reported_eps: reported,
                estimated_eps: estimated,
                surprise,
                surprise_percent,
            })
        })
        .collect()
}

fn next_earnings_date(events: Option<&YahooCalendarEvents>) -> Option<NaiveDate> {
    events?
        .earnings
        .as_ref()?
        .earnings_date
        .iter()
        .filter_map(|d| d.raw)
        .filter_map(epoch_to_date)
        .min()
}

/// Split events from a chart response, oldest first.
fn map_splits(symbol: &str, response: YahooChartResponse) -> Result<Vec<StockSplit>, MarketDataError> {
    let Some(result) = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
    };

    let mut splits: Vec<StockSplit> = result
        .events
        .map(|events| events.splits.into_values().collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .filter(|s| s.denominator != 0.0)
        .filter_map(|s| {
            Some(StockSplit {
                date: epoch_to_date(s.date)?,
                ratio: s.numerator / s.denominator,
            })
        })
        .collect();

    splits.sort_by_key(|s| s.date);
    Ok(splits)
}

fn news_query_ref(tab: NewsTab) -> &'static str {
    match tab {
        NewsTab::News => "latestNews",
        NewsTab::PressReleases => "pressRelease",
        NewsTab::All => "newsAll",
    }
}

/// Articles from a news stream, in stream order, without ads. At most `count`.
fn map_news(
    symbol: &str,
    response: YahooNewsResponse,
    count: usize,
) -> Result<Vec<NewsArticle>, MarketDataError> {
    let articles: Vec<NewsArticle> = response
        .data
        .and_then(|data| data.ticker_stream)
        .map(|stream| stream.stream)
        .unwrap_or_default()
        .into_iter()
        .filter(|item| item.ad.is_none())
        .filter_map(|item| {
            Some(NewsArticle {
                id: item.id?,
                content: item.content?,
            })
        })
        .take(count)
        .collect();

    if articles.is_empty() {
        return Err(MarketDataError::NoData(format!("{} (news)", symbol)));
    }
    Ok(articles)
}

/// Clean up fund names by removing common issuer prefixes.
fn clean_long_name(name: &str) -> String {
    const PREFIXES: [&str; 6] = [
        "iShares V PLC - ",
        "iShares VII PLC - ",
        "Vanguard Index Funds - ",
        "Vanguard Funds Public Limited Company - ",
        "Xtrackers (IE) Plc - ",
        "Amundi Index Solutions - ",
    ];

    let mut cleaned = name.replace("&amp;", "&");
    for prefix in PREFIXES {
        cleaned = cleaned.replace(prefix, "");
    }
    cleaned.trim().to_string()
}

/// Convert snake_case sector to Title Case.
fn format_sector(sector: &str) -> String {
    sector
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================
