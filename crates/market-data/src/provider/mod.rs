//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that the caching layer calls into
//! - The Yahoo Finance implementation
//!
//! Providers own their wire protocol, authentication, timeouts and retries.
//! Callers treat every `MarketDataError` as opaque and only propagate it.

mod traits;

pub mod yahoo;

// Re-exports
pub use traits::MarketDataProvider;
