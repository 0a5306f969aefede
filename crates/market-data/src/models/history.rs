use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Bar size for historical data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 4] = [
        Interval::OneHour,
        Interval::OneDay,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    /// Provider-facing interval string
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1wk",
            Interval::OneMonth => "1mo",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!(
                    "Unsupported interval '{}'. Allowed: {}",
                    s,
                    Interval::ALL.map(|i| i.as_str()).join(", ")
                ),
            })
    }
}

/// Inclusive date range plus bar size for a history request
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HistoryRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: Interval,
}

impl HistoryRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate, interval: Interval) -> Result<Self, MarketDataError> {
        if start > end {
            return Err(MarketDataError::ValidationFailed {
                message: "start must be before or equal to end".to_string(),
            });
        }
        Ok(Self {
            start,
            end,
            interval,
        })
    }
}

/// One OHLCV bar
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    pub date: NaiveDate,
    /// Bar open time; distinguishes intraday bars sharing a date
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}
