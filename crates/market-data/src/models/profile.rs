use serde::{Deserialize, Serialize};

/// Company/asset profile data from market data providers
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    /// Provider that supplied this profile (e.g., "YAHOO")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Short display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,

    /// Full legal/fund name, cleaned up for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,

    /// Listing exchange code (e.g., "NMS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,

    /// Instrument type as reported by the provider (EQUITY, ETF, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_type: Option<String>,

    /// Business sector (e.g., "Technology")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,

    /// Industry within sector (e.g., "Consumer Electronics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Country of domicile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Company website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Business description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// First line of the registered address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Trading currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Market capitalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,

    /// Shares outstanding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares_outstanding: Option<f64>,

    /// Dividend yield (as decimal, e.g., 0.025 for 2.5%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,

    /// 52-week high price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<f64>,

    /// 52-week low price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<f64>,

    /// Current price at the time the profile was fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,

    /// Trailing price-to-earnings ratio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailing_pe: Option<f64>,

    /// Beta against the market
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl AssetProfile {
    /// Create a profile with a display name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            short_name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the sector
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set the industry
    pub fn industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the currency
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// True when the provider returned nothing usable
    pub fn is_empty(&self) -> bool {
        self.short_name.is_none()
            && self.long_name.is_none()
            && self.sector.is_none()
            && self.current_price.is_none()
            && self.market_cap.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_profile_builder() {
        let profile = AssetProfile::with_name("Apple Inc.")
            .sector("Technology")
            .industry("Consumer Electronics")
            .currency("USD");

        assert_eq!(profile.short_name, Some("Apple Inc.".to_string()));
        assert_eq!(profile.sector, Some("Technology".to_string()));
        assert_eq!(profile.industry, Some("Consumer Electronics".to_string()));
        assert_eq!(profile.currency, Some("USD".to_string()));
        assert!(!profile.is_empty());
    }

    #[test]
    fn test_default_profile_is_empty() {
        assert!(AssetProfile::default().is_empty());
    }

    #[test]
    fn test_asset_profile_serialization() {
        let profile = AssetProfile {
            long_name: Some("Test Company".to_string()),
            sector: Some("Technology".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Test Company"));
        assert!(json.contains("Technology"));
        // Optional None fields should not be serialized
        assert!(!json.contains("website"));
    }
}
