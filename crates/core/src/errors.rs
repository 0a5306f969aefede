//! Core error types for the caching layer.
//!
//! The layer never interprets upstream failures; it wraps them unchanged so the
//! route layer can map them to HTTP statuses.

use thiserror::Error;

use crate::concurrency::ConcurrencyError;
use yfproxy_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the caching layer.
///
/// `Clone` because one upstream outcome is delivered to every waiter of a
/// coalesced call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The upstream adapter call failed. Propagated verbatim, never cached.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// The shared upstream call ended without producing a result, or the
    /// limiter refused a permit.
    #[error("Upstream call aborted: {0}")]
    Aborted(String),

    /// Caller supplied parameters the layer cannot normalize.
    #[error("Input validation failed: {0}")]
    Validation(String),
}

impl From<ConcurrencyError> for Error {
    fn from(err: ConcurrencyError) -> Self {
        Error::Aborted(err.to_string())
    }
}
