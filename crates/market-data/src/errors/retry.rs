use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

use super::MarketDataError;

/// Classification for retry policy.
///
/// | Class | Retried by [`RetryPolicy`]? |
/// |-------|-----------------------------|
/// | `Never` | No |
/// | `WithBackoff` | Yes, until `max_retries` is exhausted |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad symbol, malformed payload, or terminal failure.
    /// The request is fundamentally invalid and retrying won't help.
    Never,

    /// Transient failure (429, timeout, dropped connection).
    /// Retry after an exponentially growing delay.
    WithBackoff,
}

/// Retry and timeout policy applied by providers around each upstream call.
///
/// Each attempt is bounded by `attempt_timeout`. Errors classified as
/// [`RetryClass::WithBackoff`] are retried up to `max_retries` times, sleeping
/// `min(backoff_base * 2^attempt, backoff_max)` between attempts.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(32),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn no_retry(attempt_timeout: Duration) -> Self {
        Self {
            max_retries: 0,
            attempt_timeout,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2f64.powi(attempt.min(32) as i32);
        let secs = (self.backoff_base.as_secs_f64() * factor).min(self.backoff_max.as_secs_f64());
        Duration::try_from_secs_f64(secs).unwrap_or(self.backoff_max)
    }

    /// Run `call` under this policy.
    ///
    /// `provider` is used for the `Timeout` error and logging; `operation` only
    /// for logging.
    pub async fn run<T, F, Fut>(
        &self,
        provider: &str,
        operation: &str,
        mut call: F,
    ) -> Result<T, MarketDataError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let outcome = match tokio::time::timeout(self.attempt_timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(MarketDataError::Timeout {
                    provider: provider.to_string(),
                }),
            };

            match outcome {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            "{} {} succeeded after {} retries",
                            provider, operation, attempt
                        );
                    }
                    return Ok(value);
                }
                Err(err)
                    if err.retry_class() == RetryClass::WithBackoff
                        && attempt < self.max_retries =>
                {
                    let delay = self.backoff_for(attempt);
                    warn!(
                        "{} {} failed ({}), retrying in {:?} (attempt {}/{})",
                        provider,
                        operation,
                        err,
                        delay,
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(4),
            attempt_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let p = policy(5);
        assert_eq!(p.backoff_for(0), Duration::from_secs(1));
        assert_eq!(p.backoff_for(1), Duration::from_secs(2));
        assert_eq!(p.backoff_for(2), Duration::from_secs(4));
        assert_eq!(p.backoff_for(3), Duration::from_secs(4));
        assert_eq!(p.backoff_for(u32::MAX), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_error_is_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = policy(3)
            .run("YAHOO", "quote", || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(MarketDataError::RateLimited {
                            provider: "YAHOO".to_string(),
                        })
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = policy(3)
            .run("YAHOO", "quote", || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(MarketDataError::SymbolNotFound("ZZZZ".to_string())) }
            })
            .await;

        assert_eq!(
            result,
            Err(MarketDataError::SymbolNotFound("ZZZZ".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: Result<(), _> = policy(2)
            .run("YAHOO", "quote", || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(MarketDataError::Network("reset".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(MarketDataError::Network(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_times_out() {
        let p = RetryPolicy::no_retry(Duration::from_secs(1));
        let result: Result<(), _> = p
            .run("YAHOO", "history", || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert_eq!(
            result,
            Err(MarketDataError::Timeout {
                provider: "YAHOO".to_string()
            })
        );
    }
}
