//! Rate-limit admission middleware.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → key.rs (derive key, default: peer IP)
//!     → exclude.rs (excluded? → next handler, limiter untouched)
//!     → Limiter::check(key)
//!         Allowed        → next handler (+ X-RateLimit-* headers)
//!         LimitExceeded  → handlers.rs LimitReachedHandler (+ X-RateLimit-* headers)
//!         Err            → handlers.rs ErrorHandler (default: abort)
//! ```
//!
//! # Design Decisions
//! - Built once from an ordered option list; immutable afterwards
//! - Shared across request tasks through `Arc`, no locking
//! - Exactly one limiter check per non-excluded request
//! - Excluded keys are never seen by the limiter
//!
//! # Usage
//! ```rust,no_run
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use rate_gate::{Limiter, Middleware, MiddlewareOption};
//!
//! async fn serve(limiter: impl Limiter + 'static) {
//!     let gate = Middleware::new(limiter, [MiddlewareOption::excluded_keys(["127.0.0.1"])]);
//!     let app = Router::new()
//!         .route("/", get(|| async { "hello" }))
//!         .layer(from_fn_with_state(Arc::new(gate), rate_gate::middleware::handle));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod exclude;
pub mod handlers;
pub mod key;
pub mod options;

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::config::GateConfig;
use crate::limiter::{Decision, Limiter, Quota};
use crate::observability::metrics;

pub use exclude::ExcludedKey;
pub use handlers::{ErrorHandler, LimitReachedHandler};
pub use key::KeyGetter;
pub use options::MiddlewareOption;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Per-request admission control in front of an external [`Limiter`].
pub struct Middleware {
    limiter: Arc<dyn Limiter>,
    on_error: ErrorHandler,
    on_limit_reached: LimitReachedHandler,
    key_getter: KeyGetter,
    excluded_key: Option<ExcludedKey>,
    quota_headers: bool,
}

impl Middleware {
    /// Build a middleware by applying `options`, in order, over the defaults.
    pub fn new<L, I>(limiter: L, options: I) -> Self
    where
        L: Limiter + 'static,
        I: IntoIterator<Item = MiddlewareOption>,
    {
        let mut middleware = Self {
            limiter: Arc::new(limiter),
            on_error: ErrorHandler::abort(),
            on_limit_reached: LimitReachedHandler::too_many_requests(),
            key_getter: KeyGetter::client_ip(),
            excluded_key: None,
            quota_headers: true,
        };

        for option in options {
            option.apply(&mut middleware);
        }

        middleware
    }

    /// Build a middleware from a loaded [`GateConfig`].
    pub fn from_config<L>(limiter: L, config: &GateConfig) -> Self
    where
        L: Limiter + 'static,
    {
        Self::new(limiter, config.to_options())
    }

    pub fn key(&self, req: &Request) -> String {
        self.key_getter.get(req)
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_key
            .as_ref()
            .map(|excluded| excluded.matches(key))
            .unwrap_or(false)
    }

    pub fn on_error(&self) -> &ErrorHandler {
        &self.on_error
    }

    pub fn on_limit_reached(&self) -> &LimitReachedHandler {
        &self.on_limit_reached
    }

    pub fn key_getter(&self) -> &KeyGetter {
        &self.key_getter
    }

    pub fn excluded_key(&self) -> Option<&ExcludedKey> {
        self.excluded_key.as_ref()
    }

    pub fn quota_headers(&self) -> bool {
        self.quota_headers
    }

    /// Run the admission decision for one request.
    pub async fn dispatch(&self, request: Request, next: Next) -> Response {
        let key = self.key(&request);

        if self.is_excluded(&key) {
            tracing::debug!(key = %key, "Key excluded from rate limiting");
            metrics::record_decision(metrics::EXCLUDED);
            return next.run(request).await;
        }

        match self.limiter.check(&key).await {
            Ok(Decision::Allowed(quota)) => {
                tracing::debug!(key = %key, "Request allowed");
                metrics::record_decision(metrics::ALLOWED);
                let mut response = next.run(request).await;
                self.set_quota_headers(&mut response, quota);
                response
            }
            Ok(Decision::LimitExceeded(quota)) => {
                tracing::warn!(key = %key, "Rate limit exceeded");
                metrics::record_decision(metrics::LIMITED);
                let mut response = self.on_limit_reached.handle(&request);
                self.set_quota_headers(&mut response, quota);
                response
            }
            Err(err) => {
                tracing::error!(key = %key, error = %err, "Rate limiter failed");
                metrics::record_decision(metrics::ERROR);
                self.on_error.handle(&request, err)
            }
        }
    }

    fn set_quota_headers(&self, response: &mut Response, quota: Option<Quota>) {
        let Some(quota) = quota else { return };
        if !self.quota_headers {
            return;
        }

        let headers = response.headers_mut();
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(quota.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(quota.remaining));
        headers.insert(X_RATELIMIT_RESET, HeaderValue::from(quota.reset));
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("key_getter", &self.key_getter)
            .field("excluded_key", &self.excluded_key)
            .field("quota_headers", &self.quota_headers)
            .finish_non_exhaustive()
    }
}

/// Axum middleware function; mount with `axum::middleware::from_fn_with_state`.
pub async fn handle(
    State(middleware): State<Arc<Middleware>>,
    request: Request,
    next: Next,
) -> Response {
    middleware.dispatch(request, next).await
}
