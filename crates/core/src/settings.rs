//! Tunables for the caching layer, read once at start-up by the host binary.

use std::time::Duration;

/// Default number of simultaneous upstream calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// TTL and capacity of one cache instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheSettings {
    pub ttl: Duration,
    pub max_size: usize,
}

impl CacheSettings {
    pub const fn new(ttl_secs: u64, max_size: usize) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            max_size,
        }
    }

    /// A zero TTL or zero capacity turns the cache off.
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_size > 0
    }
}

/// Per-category cache settings plus the shared upstream concurrency budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreSettings {
    pub quote: CacheSettings,
    pub info: CacheSettings,
    pub history: CacheSettings,
    pub earnings: CacheSettings,
    pub splits: CacheSettings,
    pub news: CacheSettings,
    pub max_concurrency: usize,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            quote: CacheSettings::new(60, 512),
            info: CacheSettings::new(300, 256),
            history: CacheSettings::new(300, 256),
            earnings: CacheSettings::new(3600, 128),
            splits: CacheSettings::new(3600, 256),
            news: CacheSettings::new(300, 128),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}
