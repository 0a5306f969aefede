use chrono::{DateTime, NaiveDate, Utc};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use yfproxy_market_data::{
    AssetProfile, EarningsFrequency, EarningsReport, EarningsRow, HistoricalBar, NewsArticle,
    Quote,
};

/// Latest quote as served by `/quote`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub symbol: String,
    pub current_price: Decimal,
    pub previous_close: Option<Decimal>,
    pub open_price: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub volume: Option<u64>,
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        Self {
            symbol: quote.symbol,
            current_price: quote.price,
            previous_close: quote.previous_close,
            open_price: quote.open,
            high: quote.high,
            low: quote.low,
            volume: quote.volume,
        }
    }
}

/// Company information as served by `/info`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub market_cap: Option<u64>,
    pub shares_outstanding: Option<u64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub current_price: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub beta: Option<f64>,
    pub address: Option<String>,
    pub currency: Option<String>,
}

impl InfoResponse {
    pub fn from_profile(symbol: impl Into<String>, profile: AssetProfile) -> Self {
        Self {
            symbol: symbol.into(),
            short_name: profile.short_name,
            long_name: profile.long_name,
            exchange: profile.exchange,
            sector: profile.sector,
            industry: profile.industry,
            country: profile.country,
            website: profile.website,
            description: profile.description,
            market_cap: profile.market_cap.and_then(whole_count),
            shares_outstanding: profile.shares_outstanding.and_then(whole_count),
            dividend_yield: profile.dividend_yield,
            fifty_two_week_high: profile.week_52_high,
            fifty_two_week_low: profile.week_52_low,
            current_price: profile.current_price,
            trailing_pe: profile.trailing_pe,
            beta: profile.beta,
            address: profile.address,
            currency: profile.currency,
        }
    }
}

/// Counts (market cap, share totals) arrive as floats; negative or NaN are dropped.
fn whole_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 {
        value.round().to_u64()
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPrice {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Option<u64>,
}

impl From<HistoricalBar> for HistoricalPrice {
    fn from(bar: HistoricalBar) -> Self {
        Self {
            date: bar.date,
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalResponse {
    pub symbol: String,
    pub prices: Vec<HistoricalPrice>,
}

impl HistoricalResponse {
    pub fn from_bars(symbol: impl Into<String>, bars: Vec<HistoricalBar>) -> Self {
        Self {
            symbol: symbol.into(),
            prices: bars.into_iter().map(HistoricalPrice::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningsResponse {
    pub symbol: String,
    pub frequency: EarningsFrequency,
    /// Newest first
    pub rows: Vec<EarningsRow>,
    pub next_earnings_date: Option<NaiveDate>,
    pub last_eps: Option<f64>,
}

impl EarningsResponse {
    pub fn from_report(
        symbol: impl Into<String>,
        frequency: EarningsFrequency,
        report: EarningsReport,
    ) -> Self {
        let report = report.sorted_desc();
        let last_eps = report.last_eps();
        Self {
            symbol: symbol.into(),
            frequency,
            rows: report.rows,
            next_earnings_date: report.next_earnings_date,
            last_eps,
        }
    }
}

/// Info and quote for one symbol, with the two most used fields lifted to the top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub symbol: String,
    pub info: InfoResponse,
    pub quote: QuoteResponse,
    pub current_price: Option<Decimal>,
    pub currency: Option<String>,
}

impl SnapshotResponse {
    pub fn new(symbol: impl Into<String>, info: InfoResponse, quote: QuoteResponse) -> Self {
        let current_price = Some(quote.current_price);
        let currency = info.currency.clone();
        Self {
            symbol: symbol.into(),
            info,
            quote,
            current_price,
            currency,
        }
    }
}

/// Articles for one symbol, most recent first as the upstream orders them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub news: Vec<NewsArticle>,
}
