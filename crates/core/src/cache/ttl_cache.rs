use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use lru::LruCache;
use tokio::time::Instant;

use crate::metrics::{MetricsRecorder, NoopRecorder};
use crate::settings::CacheSettings;

/// A stored value with its insertion time and lifetime.
#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) > self.ttl
    }

    /// `None` when the TTL is too large to represent.
    fn expires_at(&self) -> Option<Instant> {
        self.inserted_at.checked_add(self.ttl)
    }
}

struct Entries<K, V> {
    lru: LruCache<K, CacheEntry<V>>,
    /// Lower bound on every stored entry's expiry. Removals never raise it,
    /// so it may be stale-low until the next purge recomputes it.
    earliest_expiry: Option<Instant>,
}

impl<K: Hash + Eq + Clone, V> Entries<K, V> {
    fn may_hold_expired(&self, now: Instant) -> bool {
        self.earliest_expiry.is_some_and(|at| now > at)
    }

    fn note_expiry(&mut self, at: Option<Instant>) {
        if let Some(at) = at {
            self.earliest_expiry = Some(self.earliest_expiry.map_or(at, |current| current.min(at)));
        }
    }

    /// Drop every expired entry and return how many went.
    fn purge_expired(&mut self, now: Instant) -> usize {
        let mut expired = Vec::new();
        let mut earliest: Option<Instant> = None;
        for (key, entry) in self.lru.iter() {
            if entry.is_expired(now) {
                expired.push(key.clone());
            } else if let Some(at) = entry.expires_at() {
                earliest = Some(earliest.map_or(at, |current| current.min(at)));
            }
        }
        for key in &expired {
            self.lru.pop(key);
        }
        self.earliest_expiry = earliest;
        expired.len()
    }
}

/// Bounded, per-entry expiring LRU cache.
///
/// Expiry is enforced on read: an expired entry is reported as a miss and
/// removed on that access. There is no background sweeper. When the cache is
/// full, expired entries are purged before a live least-recently-used entry is
/// evicted; the scan only runs once the earliest tracked expiry has passed.
/// Expired entries are never promoted, so they do not compete for recency.
///
/// Puts, evictions, expirations and the entry count are reported to the
/// [`MetricsRecorder`] under the cache's name.
///
/// Cloning is cheap and yields a handle to the same entries.
pub struct TtlCache<K, V> {
    name: &'static str,
    settings: CacheSettings,
    entries: Arc<Mutex<Entries<K, V>>>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            settings: self.settings,
            entries: Arc::clone(&self.entries),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Clone + std::fmt::Display,
    V: Clone,
{
    pub fn new(name: &'static str, settings: CacheSettings) -> Self {
        Self::with_metrics(name, settings, Arc::new(NoopRecorder))
    }

    pub fn with_metrics(
        name: &'static str,
        settings: CacheSettings,
        metrics: Arc<dyn MetricsRecorder>,
    ) -> Self {
        let capacity = NonZeroUsize::new(settings.max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            settings,
            entries: Arc::new(Mutex::new(Entries {
                lru: LruCache::new(capacity),
                earliest_expiry: None,
            })),
            metrics,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_enabled()
    }

    fn lock(&self) -> MutexGuard<'_, Entries<K, V>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("{} cache mutex poisoned, recovering", self.name);
            poisoned.into_inner()
        })
    }

    /// Look up `key`. Misses when absent or expired; a hit becomes most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        if !self.is_enabled() {
            return None;
        }

        let now = Instant::now();
        let mut entries = self.lock();
        let expired = entries.lru.peek(key)?.is_expired(now);
        if !expired {
            return entries.lru.get(key).map(|entry| entry.value.clone());
        }

        entries.lru.pop(key);
        let len = entries.lru.len();
        drop(entries);

        debug!("{} cache entry expired: {}", self.name, key);
        self.metrics.record_cache_expiration(self.name);
        self.metrics.record_cache_size(self.name, len);
        None
    }

    /// Insert with the cache's configured TTL.
    pub fn set(&self, key: K, value: V) {
        self.set_with_ttl(key, value, self.settings.ttl);
    }

    /// Insert or overwrite with an explicit TTL. No-op when the cache is
    /// disabled or `ttl` is zero.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) {
        if !self.is_enabled() || ttl.is_zero() {
            return;
        }

        let now = Instant::now();
        let mut entries = self.lock();
        let mut expired = 0;
        if !entries.lru.contains(&key)
            && entries.lru.len() >= entries.lru.cap().get()
            && entries.may_hold_expired(now)
        {
            expired = entries.purge_expired(now);
        }

        let entry = CacheEntry {
            value,
            inserted_at: now,
            ttl,
        };
        let expires_at = entry.expires_at();
        let evicted = entries
            .lru
            .push(key.clone(), entry)
            .map(|(evicted, _)| evicted)
            .filter(|evicted| *evicted != key);
        entries.note_expiry(expires_at);
        let len = entries.lru.len();
        drop(entries);

        for _ in 0..expired {
            self.metrics.record_cache_expiration(self.name);
        }
        if let Some(evicted) = evicted {
            debug!("{} cache full, evicted {}", self.name, evicted);
            self.metrics.record_cache_eviction(self.name);
        }
        self.metrics.record_cache_put(self.name);
        self.metrics.record_cache_size(self.name, len);
    }

    /// Number of stored entries, including expired ones not yet touched.
    pub fn size(&self) -> usize {
        self.lock().lru.len()
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.lru.clear();
        entries.earliest_expiry = None;
        drop(entries);
        self.metrics.record_cache_size(self.name, 0);
    }
}
