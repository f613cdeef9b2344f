//! Terminal handlers.
//!
//! Both handler kinds end the request cycle: they return the response sent in
//! place of the inner service's, or diverge. Neither can fall through to the
//! next handler in the chain.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::limiter::LimiterError;

/// Body of the default limit-reached response.
pub const LIMIT_EXCEEDED_BODY: &str = "Limit exceeded";

/// Body of [`ErrorHandler::service_unavailable`] responses.
pub const LIMITER_UNAVAILABLE_BODY: &str = "Rate limiter unavailable";

type ErrorFn = dyn Fn(&Request, LimiterError) -> Response + Send + Sync;
type LimitReachedFn = dyn Fn(&Request) -> Response + Send + Sync;

/// Invoked when the limiter fails to reach a decision.
#[derive(Clone)]
pub struct ErrorHandler(Arc<ErrorFn>);

impl ErrorHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Request, LimiterError) -> Response + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Escalate the failure as a panic carrying the [`LimiterError`]. This is
    /// the default: requests are neither silently allowed nor silently denied.
    pub fn abort() -> Self {
        Self::new(abort_on_error)
    }

    /// Fail closed with `503 Service Unavailable`.
    pub fn service_unavailable() -> Self {
        Self::new(|_req, _err| {
            (StatusCode::SERVICE_UNAVAILABLE, LIMITER_UNAVAILABLE_BODY).into_response()
        })
    }

    pub fn handle(&self, req: &Request, err: LimiterError) -> Response {
        (self.0)(req, err)
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::abort()
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorHandler(..)")
    }
}

/// Invoked when the limiter reports the key over budget.
#[derive(Clone)]
pub struct LimitReachedHandler(Arc<LimitReachedFn>);

impl LimitReachedHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// `429 Too Many Requests` with body `Limit exceeded`. This is the default.
    pub fn too_many_requests() -> Self {
        Self::new(|_req| (StatusCode::TOO_MANY_REQUESTS, LIMIT_EXCEEDED_BODY).into_response())
    }

    pub fn handle(&self, req: &Request) -> Response {
        (self.0)(req)
    }
}

impl Default for LimitReachedHandler {
    fn default() -> Self {
        Self::too_many_requests()
    }
}

impl fmt::Debug for LimitReachedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LimitReachedHandler(..)")
    }
}

/// Default error path. The panic payload is the `LimiterError` itself, so a
/// host-level panic catcher can tell it apart from other panics.
///
/// The failure is already logged by the dispatcher before this runs.
pub fn abort_on_error(_req: &Request, err: LimiterError) -> Response {
    std::panic::panic_any(err)
}
