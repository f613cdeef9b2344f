//! Rate-limit key derivation.
//!
//! # Responsibilities
//! - Map a request to the string key the limiter accounts against
//! - Never mutate the request
//!
//! # Design Decisions
//! - Default key is the peer IP from `ConnectInfo<SocketAddr>`
//! - Header-based strategies are opt-in; they can be spoofed unless a trusted
//!   proxy overwrites the header
//! - Missing connection info yields an empty key rather than an error

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request};

type KeyFn = dyn Fn(&Request) -> String + Send + Sync;

/// Computes the rate-limit key for a request.
#[derive(Clone)]
pub struct KeyGetter(Arc<KeyFn>);

impl KeyGetter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Request) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Key on the peer address reported by the server. This is the default.
    pub fn client_ip() -> Self {
        Self::new(|req| client_ip(req).map(|ip| ip.to_string()).unwrap_or_default())
    }

    /// Key on the value of `name`, falling back to the peer address when the
    /// header is missing or not valid UTF-8.
    pub fn header(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(move |req| {
            req.headers()
                .get(name.as_str())
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| client_ip(req).map(|ip| ip.to_string()).unwrap_or_default())
        })
    }

    /// Key on the leftmost `X-Forwarded-For` entry, then `X-Real-IP`, then the
    /// peer address. Only sound behind a proxy that overwrites these headers.
    pub fn forwarded_for() -> Self {
        Self::new(|req| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                // "client, proxy1, proxy2"
                .and_then(|s| s.split(',').next())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .or_else(|| {
                    req.headers()
                        .get("x-real-ip")
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                })
                .or_else(|| client_ip(req).map(|ip| ip.to_string()))
                .unwrap_or_default()
        })
    }

    pub fn get(&self, req: &Request) -> String {
        (self.0)(req)
    }
}

impl Default for KeyGetter {
    fn default() -> Self {
        Self::client_ip()
    }
}

impl fmt::Debug for KeyGetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyGetter(..)")
    }
}

/// Peer IP as recorded by `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn client_ip(req: &Request) -> Option<IpAddr> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}
