//! Yahoo Finance API response models.
//!
//! These cover the quoteSummary endpoint (quote, profile, earnings), the
//! chart endpoint's `events` block (splits) and the news stream.

use std::collections::HashMap;

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::models::NewsContent;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container. `result` is `null` when Yahoo reports an error.
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

/// Error object embedded in quoteSummary/chart responses
#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_profile: Option<YahooSummaryProfile>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
    pub earnings_history: Option<YahooEarningsHistory>,
    pub calendar_events: Option<YahooCalendarEvents>,
}

/// Price data from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
    pub regular_market_previous_close: Option<YahooPriceDetail>,
    pub regular_market_open: Option<YahooPriceDetail>,
    pub regular_market_day_high: Option<YahooPriceDetail>,
    pub regular_market_day_low: Option<YahooPriceDetail>,
    pub regular_market_volume: Option<YahooPriceDetail>,
    pub regular_market_time: Option<i64>,
}

/// Numeric value with raw and formatted forms. Yahoo sends `{}` when empty.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
}

/// Epoch-seconds value with raw and formatted forms
#[derive(Debug, Deserialize, Clone, Default)]
pub struct YahooDateDetail {
    pub raw: Option<i64>,
}

/// Summary profile data (company info)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
    #[serde(alias = "description")]
    pub description: Option<String>,
    pub country: Option<String>,
    pub address1: Option<String>,
}

/// Summary detail data (financial metrics)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub currency: Option<String>,
    pub market_cap: Option<YahooPriceDetail>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooPriceDetail>,
    pub dividend_yield: Option<YahooPriceDetail>,
    pub fifty_two_week_high: Option<YahooPriceDetail>,
    pub fifty_two_week_low: Option<YahooPriceDetail>,
    pub beta: Option<YahooPriceDetail>,
}

/// Key statistics module
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub shares_outstanding: Option<YahooPriceDetail>,
    pub beta: Option<YahooPriceDetail>,
}

/// Last four reported quarters
#[derive(Debug, Deserialize)]
pub struct YahooEarningsHistory {
    #[serde(default)]
    pub history: Vec<YahooEarningsHistoryItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooEarningsHistoryItem {
    pub quarter: Option<YahooDateDetail>,
    pub eps_actual: Option<YahooPriceDetail>,
    pub eps_estimate: Option<YahooPriceDetail>,
    pub eps_difference: Option<YahooPriceDetail>,
    pub surprise_percent: Option<YahooPriceDetail>,
}

/// Upcoming events
#[derive(Debug, Deserialize)]
pub struct YahooCalendarEvents {
    pub earnings: Option<YahooCalendarEarnings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooCalendarEarnings {
    #[serde(default)]
    pub earnings_date: Vec<YahooDateDetail>,
}

/// Chart endpoint wrapper (only the parts needed for corporate events)
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub events: Option<YahooChartEvents>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartEvents {
    /// Keyed by the event's epoch timestamp as a string
    #[serde(default)]
    pub splits: HashMap<String, YahooSplitEvent>,
}

#[derive(Debug, Deserialize)]
pub struct YahooSplitEvent {
    pub date: i64,
    pub numerator: f64,
    pub denominator: f64,
}

/// News stream response: `data.tickerStream.stream`
#[derive(Debug, Deserialize)]
pub struct YahooNewsResponse {
    pub data: Option<YahooNewsData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooNewsData {
    pub ticker_stream: Option<YahooTickerStream>,
}

#[derive(Debug, Deserialize)]
pub struct YahooTickerStream {
    #[serde(default)]
    pub stream: Vec<YahooStreamItem>,
}

/// Stream entries are articles or ads; ads carry an `ad` field.
#[derive(Debug, Deserialize)]
pub struct YahooStreamItem {
    pub id: Option<String>,
    pub content: Option<NewsContent>,
    pub ad: Option<IgnoredAny>,
}

/// Shorthand for `Option<YahooPriceDetail>` -> `Option<f64>`
pub fn raw(detail: &Option<YahooPriceDetail>) -> Option<f64> {
    detail.as_ref().and_then(|d| d.raw)
}
