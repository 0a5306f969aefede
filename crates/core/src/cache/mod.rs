//! Result caching.
//!
//! - [`key`] - Deterministic cache keys built from an operation, a symbol and parameters
//! - [`ttl_cache`] - Bounded LRU cache with per-entry expiry
//!
//! One [`TtlCache`] instance exists per data category so that quote churn
//! never evicts slow-moving company info.

pub mod key;
pub mod ttl_cache;

pub use key::{normalize_symbol, CacheKey};
pub use ttl_cache::TtlCache;
