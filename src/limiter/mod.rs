//! Limiter boundary.
//!
//! # Data Flow
//! ```text
//! Middleware (per non-excluded request)
//!     → Limiter::check(key)
//!     → Ok(Decision::Allowed)        → continue the chain
//!     → Ok(Decision::LimitExceeded)  → LimitReachedHandler
//!     → Err(LimiterError)            → ErrorHandler
//! ```
//!
//! # Design Decisions
//! - The counting algorithm and its store live behind this trait, outside the crate
//! - Exactly one check per request; no retries, no caching of decisions
//! - Quota figures are optional so that bare allow/deny limiters fit too

mod error;

use std::sync::Arc;

use async_trait::async_trait;

pub use error::LimiterError;

/// Budget figures a limiter may attach to its decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Requests allowed per period.
    pub limit: u64,
    /// Requests left in the current period.
    pub remaining: u64,
    /// UNIX timestamp (seconds) at which the period resets.
    pub reset: u64,
}

/// Outcome of a successful limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed(Option<Quota>),
    LimitExceeded(Option<Quota>),
}

impl Decision {
    pub fn quota(&self) -> Option<Quota> {
        match self {
            Decision::Allowed(quota) | Decision::LimitExceeded(quota) => *quota,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed(_))
    }
}

/// External rate-limiting decision source.
///
/// Implementations must be safe to call concurrently from many request tasks.
#[async_trait]
pub trait Limiter: Send + Sync {
    /// Consume one unit of budget for `key` and report the outcome.
    async fn check(&self, key: &str) -> Result<Decision, LimiterError>;
}

#[async_trait]
impl<L> Limiter for Arc<L>
where
    L: Limiter + ?Sized,
{
    async fn check(&self, key: &str) -> Result<Decision, LimiterError> {
        (**self).check(key).await
    }
}
