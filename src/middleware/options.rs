//! Construction-time middleware options.

use axum::{extract::Request, response::Response};

use super::exclude::ExcludedKey;
use super::handlers::{ErrorHandler, LimitReachedHandler};
use super::key::KeyGetter;
use super::Middleware;
use crate::limiter::LimiterError;

/// A single mutation of one [`Middleware`] field.
///
/// Options are applied in order by [`Middleware::new`]; the last option
/// targeting a field wins. Nothing is merged.
#[derive(Debug, Clone)]
pub enum MiddlewareOption {
    ErrorHandler(ErrorHandler),
    LimitReachedHandler(LimitReachedHandler),
    KeyGetter(KeyGetter),
    ExcludedKey(ExcludedKey),
    /// Emit `X-RateLimit-*` headers when the limiter reports a quota.
    QuotaHeaders(bool),
}

impl MiddlewareOption {
    pub fn error_handler<F>(f: F) -> Self
    where
        F: Fn(&Request, LimiterError) -> Response + Send + Sync + 'static,
    {
        MiddlewareOption::ErrorHandler(ErrorHandler::new(f))
    }

    pub fn limit_reached_handler<F>(f: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        MiddlewareOption::LimitReachedHandler(LimitReachedHandler::new(f))
    }

    pub fn key_getter<F>(f: F) -> Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        MiddlewareOption::KeyGetter(KeyGetter::new(f))
    }

    pub fn excluded_key<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        MiddlewareOption::ExcludedKey(ExcludedKey::new(f))
    }

    /// Exclude a fixed list of keys.
    pub fn excluded_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MiddlewareOption::ExcludedKey(ExcludedKey::from_keys(keys))
    }

    pub fn quota_headers(enabled: bool) -> Self {
        MiddlewareOption::QuotaHeaders(enabled)
    }

    pub(crate) fn apply(self, middleware: &mut Middleware) {
        match self {
            MiddlewareOption::ErrorHandler(handler) => middleware.on_error = handler,
            MiddlewareOption::LimitReachedHandler(handler) => middleware.on_limit_reached = handler,
            MiddlewareOption::KeyGetter(getter) => middleware.key_getter = getter,
            MiddlewareOption::ExcludedKey(excluded) => middleware.excluded_key = Some(excluded),
            MiddlewareOption::QuotaHeaders(enabled) => middleware.quota_headers = enabled,
        }
    }
}
