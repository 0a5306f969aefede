//! Cache, coalescer and limiter wired together for one data category.

use std::future::Future;
use std::sync::Arc;

use log::debug;
use tokio::time::Instant;
use yfproxy_market_data::MarketDataError;

use crate::cache::{CacheKey, TtlCache};
use crate::concurrency::{ConcurrencyLimiter, SingleFlight};
use crate::errors::Result;
use crate::metrics::{CacheResult, MetricsRecorder, UpstreamOutcome};
use crate::settings::CacheSettings;

/// Read-through access to the upstream for one category (quote, info, ...).
///
/// A lookup is served from the category's cache when possible. On a miss it
/// joins or starts the single in-flight call for that key; the call waits for
/// a slot on the shared limiter, invokes the upstream and stores a successful
/// value before handing it to every waiter. Failures are passed through and
/// never stored. [`fetch_uncached`](Self::fetch_uncached) skips the cache and
/// the coalescer but still takes a limiter slot.
pub struct CachedFetcher<V> {
    category: &'static str,
    cache: TtlCache<CacheKey, V>,
    flights: SingleFlight<CacheKey, V, crate::Error>,
    limiter: ConcurrencyLimiter,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<V> CachedFetcher<V>
where
    V: Clone + Send + 'static,
{
    pub fn new(
        category: &'static str,
        settings: CacheSettings,
        limiter: ConcurrencyLimiter,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        Self {
            category,
            cache: TtlCache::with_metrics(category, settings, Arc::clone(&metrics)),
            flights: SingleFlight::new(),
            limiter,
            metrics,
        }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn cache(&self) -> &TtlCache<CacheKey, V> {
        &self.cache
    }

    pub fn in_flight(&self) -> usize {
        self.flights.in_flight()
    }

    /// Return the cached value for `key` or load it with `fetch`.
    ///
    /// `fetch` runs at most once per key at a time across all callers and only
    /// while holding a limiter permit.
    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<V, MarketDataError>> + Send + 'static,
    {
        if let Some(value) = self.cache.get(&key) {
            self.metrics
                .record_cache_result(self.category, CacheResult::Hit);
            return Ok(value);
        }
        self.metrics
            .record_cache_result(self.category, CacheResult::Miss);

        let load = Load {
            category: self.category,
            key: key.clone(),
            cache: self.cache.clone(),
            limiter: self.limiter.clone(),
            metrics: Arc::clone(&self.metrics),
        };
        self.flights.run(key, move || load.run(fetch)).await
    }

    /// Call the upstream for `key` without reading or writing the cache.
    pub async fn fetch_uncached<F, Fut>(&self, key: &CacheKey, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, MarketDataError>>,
    {
        call_upstream(
            self.category,
            key,
            &self.limiter,
            self.metrics.as_ref(),
            fetch,
        )
        .await
    }
}

/// Run `fetch` under a limiter permit and record how it went.
async fn call_upstream<V, F, Fut>(
    category: &'static str,
    key: &CacheKey,
    limiter: &ConcurrencyLimiter,
    metrics: &dyn MetricsRecorder,
    fetch: F,
) -> Result<V>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<V, MarketDataError>>,
{
    let permit = limiter.acquire().await?;
    let started = Instant::now();
    let outcome = fetch().await;
    let elapsed = started.elapsed();
    limiter.release(permit);

    let status = match &outcome {
        Ok(_) => UpstreamOutcome::Success,
        Err(MarketDataError::Timeout { .. }) => UpstreamOutcome::Timeout,
        Err(_) => UpstreamOutcome::Error,
    };
    metrics.record_upstream_call(category, elapsed, status);
    debug!(
        "Upstream {} call for {} finished in {:?} ({})",
        category, key, elapsed, status
    );

    Ok(outcome?)
}

/// Everything the detached producer task needs, owned.
struct Load<V> {
    category: &'static str,
    key: CacheKey,
    cache: TtlCache<CacheKey, V>,
    limiter: ConcurrencyLimiter,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<V> Load<V>
where
    V: Clone + Send + 'static,
{
    async fn run<F, Fut>(self, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, MarketDataError>>,
    {
        // A call for this key may have completed between our miss and registering
        if let Some(value) = self.cache.get(&self.key) {
            return Ok(value);
        }

        let value = call_upstream(
            self.category,
            &self.key,
            &self.limiter,
            self.metrics.as_ref(),
            fetch,
        )
        .await?;
        self.cache.set(self.key, value.clone());
        Ok(value)
    }
}
