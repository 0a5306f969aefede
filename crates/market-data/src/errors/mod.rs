//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all upstream operations
//! - [`RetryClass`]: Classification for determining retry behavior
//! - [`RetryPolicy`]: Per-attempt timeout plus exponential backoff

mod retry;

pub use retry::{RetryClass, RetryPolicy};

use thiserror::Error;

/// Errors that can occur while talking to an upstream provider.
///
/// The type is `Clone` so a single outcome can be handed to every caller
/// waiting on the same upstream call. Each variant is classified into a
/// [`RetryClass`] via [`retry_class`](Self::retry_class).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but the provider returned nothing for the request
    /// (empty history range, no earnings rows, ...).
    #[error("No data for {0}")]
    NoData(String),

    /// The provider answered, but the payload could not be understood.
    #[error("Malformed data from {provider}: {message}")]
    MalformedResponse {
        /// The provider that returned the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The provider rate limited the request (HTTP 429).
    /// Should retry with exponential backoff.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    /// Should retry with exponential backoff.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (auth failure, unexpected status).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider does not implement this operation.
    #[error("{provider} does not support {operation}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider that was asked
        provider: String,
    },

    /// Data validation failed.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(String),
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use yfproxy_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "YAHOO".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal errors - never retry
            Self::SymbolNotFound(_)
            | Self::NoData(_)
            | Self::MalformedResponse { .. }
            | Self::ProviderError { .. }
            | Self::NotSupported { .. }
            | Self::ValidationFailed { .. } => RetryClass::Never,

            // Transient errors - retry with backoff
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => {
                RetryClass::WithBackoff
            }
        }
    }

    /// True for errors meaning "the upstream has nothing for this symbol".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::NoData(_))
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: "HTTP".to_string(),
            }
        } else if err.is_decode() {
            Self::MalformedResponse {
                provider: "HTTP".to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_never_retries() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_no_data_never_retries() {
        let error = MarketDataError::NoData("AAPL".to_string());
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_malformed_never_retries() {
        let error = MarketDataError::MalformedResponse {
            provider: "YAHOO".to_string(),
            message: "missing result".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_transient_errors_retry_with_backoff() {
        let errors = [
            MarketDataError::RateLimited {
                provider: "YAHOO".to_string(),
            },
            MarketDataError::Timeout {
                provider: "YAHOO".to_string(),
            },
            MarketDataError::Network("connection reset".to_string()),
        ];
        for error in errors {
            assert_eq!(error.retry_class(), RetryClass::WithBackoff, "{error}");
        }
    }

    #[test]
    fn test_not_supported_never_retries() {
        let error = MarketDataError::NotSupported {
            operation: "splits".to_string(),
            provider: "TEST".to_string(),
        };
        assert_eq!(error.retry_class(), RetryClass::Never);
        assert_eq!(error.to_string(), "TEST does not support splits");
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::RateLimited {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(format!("{}", error), "Rate limited: YAHOO");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "Yahoo authentication expired".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: YAHOO - Yahoo authentication expired"
        );
    }

    #[test]
    fn test_errors_are_cloneable_and_comparable() {
        let error = MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.clone(), error);
    }
}
