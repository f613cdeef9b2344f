//! Rate-limit admission middleware for axum.
//!
//! For each request the [`Middleware`] derives a key, skips excluded keys,
//! asks an external [`Limiter`] for a decision and either continues the
//! handler chain or ends it through a terminal handler.

pub mod config;
pub mod limiter;
pub mod middleware;
pub mod observability;

pub use config::GateConfig;
pub use limiter::{Decision, Limiter, LimiterError, Quota};
pub use middleware::{
    ErrorHandler, ExcludedKey, KeyGetter, LimitReachedHandler, Middleware, MiddlewareOption,
};
