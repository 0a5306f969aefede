use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Reporting period for earnings rows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarningsFrequency {
    #[default]
    Quarterly,
    Annual,
}

impl EarningsFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            EarningsFrequency::Quarterly => "quarterly",
            EarningsFrequency::Annual => "annual",
        }
    }
}

impl fmt::Display for EarningsFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EarningsFrequency {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" => Ok(EarningsFrequency::Quarterly),
            "annual" => Ok(EarningsFrequency::Annual),
            other => Err(MarketDataError::ValidationFailed {
                message: format!(
                    "Unsupported frequency '{}'. Allowed: quarterly, annual",
                    other
                ),
            }),
        }
    }
}

/// One reported (or estimated) earnings period
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningsRow {
    pub earnings_date: NaiveDate,
    pub reported_eps: Option<f64>,
    pub estimated_eps: Option<f64>,
    pub surprise: Option<f64>,
    pub surprise_percent: Option<f64>,
}

/// Earnings rows for one symbol and frequency, as returned by a provider
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsReport {
    pub rows: Vec<EarningsRow>,
    pub next_earnings_date: Option<NaiveDate>,
}

impl EarningsReport {
    /// Sort rows newest first.
    pub fn sorted_desc(mut self) -> Self {
        self.rows
            .sort_by(|a, b| b.earnings_date.cmp(&a.earnings_date));
        self
    }

    /// Most recent reported EPS. Assumes rows are sorted newest first.
    pub fn last_eps(&self) -> Option<f64> {
        self.rows.iter().find_map(|r| r.reported_eps)
    }
}
