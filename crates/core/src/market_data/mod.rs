//! Market data service - cached, coalesced access to the upstream provider.
//!
//! - [`model`] - Response shapes handed to the HTTP layer
//! - [`service`] - One cached fetcher per data category behind a service trait
//!
//! ```text
//! route -> MarketDataService -> CachedFetcher (per category) -> MarketDataProvider
//!                 |                      |
//!              fan_out          TtlCache / SingleFlight / ConcurrencyLimiter
//! ```

mod model;
mod service;

#[cfg(test)]
mod service_tests;

pub use model::{
    EarningsResponse, HistoricalPrice, HistoricalResponse, InfoResponse, NewsResponse,
    QuoteResponse, SnapshotResponse,
};
pub use service::{MarketDataService, MarketDataServiceTrait};
