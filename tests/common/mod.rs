//! Shared utilities for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use rate_gate::{Decision, Limiter, LimiterError, Middleware};

type Script = dyn Fn(&str) -> Result<Decision, LimiterError> + Send + Sync;

/// A limiter whose answer is scripted per key and which records every call.
pub struct MockLimiter {
    script: Box<Script>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockLimiter {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&str) -> Result<Decision, LimiterError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            calls: Mutex::new(HashMap::new()),
        })
    }

    pub fn always(decision: Decision) -> Arc<Self> {
        Self::new(move |_| Ok(decision))
    }

    #[allow(dead_code)]
    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(LimiterError::Unavailable("store unreachable".into())))
    }

    pub fn calls_for(&self, key: &str) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Limiter for MockLimiter {
    async fn check(&self, key: &str) -> Result<Decision, LimiterError> {
        *self.calls.lock().unwrap().entry(key.to_string()).or_default() += 1;
        (self.script)(key)
    }
}

/// Router with a single `GET /` handler behind the middleware.
///
/// Returns the router and the number of times the inner handler ran.
pub fn app(middleware: Middleware) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let router = Router::new()
        .route(
            "/",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .layer(from_fn_with_state(
            Arc::new(middleware),
            rate_gate::middleware::handle,
        ));

    (router, hits)
}

/// A request as seen behind `into_make_service_with_connect_info`.
#[allow(dead_code)]
pub fn request_from(addr: &str) -> Request {
    let addr: SocketAddr = addr.parse().unwrap();
    let mut req = Request::builder().uri("/").body(Body::empty()).unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}
