use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use yfproxy_core::{CacheSettings, CoreSettings};
use yfproxy_market_data::RetryPolicy;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_enabled: bool,
    pub cors_allow: Vec<String>,
    /// Whole-request deadline enforced by the HTTP layer.
    pub request_timeout: Duration,
    /// Upstream retry and per-attempt timeout.
    pub retry: RetryPolicy,
    /// `Some` when API key auth is enabled.
    pub api_key: Option<String>,
    pub max_bulk_symbols: usize,
    /// Upper bound for the `count` query of the news endpoint.
    pub news_max_items: usize,
    pub core: CoreSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let vars = Vars { lookup: &lookup };

        let listen_addr_raw = vars
            .string("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let listen_addr: SocketAddr = listen_addr_raw
            .parse()
            .with_context(|| format!("Invalid LISTEN_ADDR '{}'", listen_addr_raw))?;

        let cors_allow = vars
            .string("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let api_key = if vars.flag("API_KEY_ENABLED", false) {
            let key = vars.string("API_KEY").unwrap_or_default();
            if key.trim().is_empty() {
                bail!("API_KEY_ENABLED is true but API_KEY is empty");
            }
            Some(key)
        } else {
            None
        };

        let defaults = CoreSettings::default();
        let core = CoreSettings {
            quote: vars.cache_with_alias("TICKER", "QUOTE", defaults.quote),
            info: vars.cache("INFO", defaults.info),
            history: vars.cache("HISTORY", defaults.history),
            earnings: vars.cache("EARNINGS", defaults.earnings),
            splits: vars.cache("SPLITS", defaults.splits),
            news: vars.cache("NEWS", defaults.news),
            max_concurrency: vars
                .parsed("MAX_BULK_CONCURRENCY", defaults.max_concurrency)
                .max(1),
        };

        let retry = RetryPolicy {
            max_retries: vars.parsed("MAX_RETRIES", 3),
            backoff_base: secs_f64(vars.parsed("RETRY_BACKOFF_BASE", 1.0)),
            backoff_max: secs_f64(vars.parsed("RETRY_BACKOFF_MAX", 32.0)),
            attempt_timeout: Duration::from_secs(vars.parsed("REQUEST_TIMEOUT", 30)),
        };

        Ok(Self {
            listen_addr,
            cors_enabled: vars.flag("CORS_ENABLED", false),
            cors_allow,
            request_timeout: Duration::from_secs(vars.parsed("HTTP_TIMEOUT_SECS", 60)),
            retry,
            api_key,
            max_bulk_symbols: vars.parsed::<usize>("MAX_BULK_SYMBOLS", 50).max(1),
            news_max_items: vars.parsed::<usize>("NEWS_MAX_ITEMS", 100).max(1),
            core,
        })
    }
}

fn secs_f64(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}

struct Vars<'a, F: Fn(&str) -> Option<String>> {
    lookup: &'a F,
}

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Unparseable values fall back to the default with a warning.
    fn parsed<T: FromStr>(&self, name: &str, default: T) -> T {
        match self.string(name) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid {}='{}', using default", name, raw);
                default
            }),
            None => default,
        }
    }

    fn flag(&self, name: &str, default: bool) -> bool {
        match self.string(name).map(|v| v.to_ascii_lowercase()) {
            Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
            Some(v) => {
                tracing::warn!("Ignoring invalid {}='{}', using default", name, v);
                default
            }
            None => default,
        }
    }

    fn cache(&self, category: &str, default: CacheSettings) -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(
                self.parsed(&format!("{}_CACHE_TTL", category), default.ttl.as_secs()),
            ),
            max_size: self.parsed(&format!("{}_CACHE_MAXSIZE", category), default.max_size),
        }
    }

    /// Like [`cache`](Self::cache), but each `{alias}_CACHE_*` variable is
    /// consulted when the matching `{category}_CACHE_*` one is unset.
    fn cache_with_alias(
        &self,
        category: &str,
        alias: &str,
        default: CacheSettings,
    ) -> CacheSettings {
        let fallback = self.cache(alias, default);
        self.cache(category, fallback)
    }
}
