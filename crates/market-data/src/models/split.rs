use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stock split event. `ratio` is new shares per old share (4.0 for a 4:1 split).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StockSplit {
    pub date: NaiveDate,
    pub ratio: f64,
}
