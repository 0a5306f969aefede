//! Concurrency control between inbound requests and the upstream provider.
//!
//! - [`single_flight`] - At most one in-flight upstream call per key
//! - [`limiter`] - Process-wide bound on simultaneous upstream calls
//! - [`fan_out`] - Concurrent, order-preserving multi-key lookups

pub mod fan_out;
pub mod limiter;
pub mod single_flight;

use thiserror::Error;

pub use fan_out::fan_out;
pub use limiter::{ConcurrencyLimiter, UpstreamPermit};
pub use single_flight::SingleFlight;

/// Failures produced by the concurrency primitives themselves, never by the upstream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConcurrencyError {
    /// The shared producer task ended without a result (panic or runtime shutdown).
    #[error("in-flight call ended without producing a result")]
    ProducerAborted,

    /// The limiter's semaphore was closed.
    #[error("concurrency limiter is closed")]
    LimiterClosed,
}
