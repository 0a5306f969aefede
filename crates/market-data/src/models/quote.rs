use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market quote for a symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Normalized (uppercase) symbol
    pub symbol: String,

    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,

    /// Current/last traded price (required)
    pub price: Decimal,

    /// Previous session close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Decimal>,

    /// Session open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,

    /// Session high
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,

    /// Session low
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,

    /// Session volume. `None` means the provider did not report it,
    /// which is different from zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,

    /// Quote currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Source of the quote (YAHOO, ...)
    pub source: String,
}

impl Quote {
    /// Create a quote with only the required fields
    pub fn new(
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        price: Decimal,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            price,
            previous_close: None,
            open: None,
            high: None,
            low: None,
            volume: None,
            currency: None,
            source: source.into(),
        }
    }

    /// Absolute change against the previous close, when known
    pub fn change(&self) -> Option<Decimal> {
        self.previous_close.map(|prev| self.price - prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_new() {
        let quote = Quote::new("AAPL", Utc::now(), dec!(150.25), "YAHOO");
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(150.25));
        assert!(quote.open.is_none());
        assert!(quote.volume.is_none());
    }

    #[test]
    fn test_change_requires_previous_close() {
        let mut quote = Quote::new("AAPL", Utc::now(), dec!(150.00), "YAHOO");
        assert_eq!(quote.change(), None);

        quote.previous_close = Some(dec!(148.00));
        assert_eq!(quote.change(), Some(dec!(2.00)));
    }

    #[test]
    fn test_missing_fields_are_not_serialized() {
        let quote = Quote::new("MSFT", Utc::now(), dec!(300), "YAHOO");
        let json = serde_json::to_value(&quote).unwrap();
        assert!(json.get("open").is_none());
        assert!(json.get("volume").is_none());
        assert_eq!(json["price"], serde_json::json!(300.0));
    }
}
