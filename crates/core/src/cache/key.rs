use std::collections::BTreeMap;
use std::fmt;

/// Normalize a ticker symbol the way every cache key and upstream call sees it.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Deterministic identifier for one cacheable upstream query.
///
/// Rendered as `operation:SYMBOL[:name=value...]`. Parameters are sorted by
/// name, so the same logical query always yields the same key regardless of
/// the order parameters were supplied in or the casing of the symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for an operation that only depends on the symbol.
    pub fn new(operation: &str, symbol: &str) -> Self {
        Self::with_params(operation, symbol, std::iter::empty::<(&str, &str)>())
    }

    /// Key for an operation with extra parameters (date range, interval, ...).
    pub fn with_params<I, K, V>(operation: &str, symbol: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        let params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| {
                (
                    k.as_ref().trim().to_ascii_lowercase(),
                    v.to_string().trim().to_string(),
                )
            })
            .collect();

        let mut rendered = format!(
            "{}:{}",
            operation.trim().to_ascii_lowercase(),
            normalize_symbol(symbol)
        );
        for (name, value) in &params {
            rendered.push(':');
            rendered.push_str(name);
            rendered.push('=');
            rendered.push_str(value);
        }
        Self(rendered)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_casing_does_not_matter() {
        assert_eq!(CacheKey::new("quote", " aapl "), CacheKey::new("quote", "AAPL"));
        assert_eq!(CacheKey::new("quote", "aapl").as_str(), "quote:AAPL");
    }

    #[test]
    fn test_param_order_does_not_matter() {
        let a = CacheKey::with_params(
            "history",
            "msft",
            [("start", "2024-01-01"), ("end", "2024-01-31"), ("interval", "1d")],
        );
        let b = CacheKey::with_params(
            "history",
            "MSFT",
            [("interval", "1d"), ("end", "2024-01-31"), ("start", "2024-01-01")],
        );
        assert_eq!(a, b);
        assert_eq!(
            a.to_string(),
            "history:MSFT:end=2024-01-31:interval=1d:start=2024-01-01"
        );
    }

    #[test]
    fn test_different_params_give_different_keys() {
        let quarterly = CacheKey::with_params("earnings", "AAPL", [("frequency", "quarterly")]);
        let annual = CacheKey::with_params("earnings", "AAPL", [("frequency", "annual")]);
        assert_ne!(quarterly, annual);
        assert_ne!(CacheKey::new("info", "AAPL"), CacheKey::new("quote", "AAPL"));
    }
}
