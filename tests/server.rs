//! End-to-end tests over a real TCP listener.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::Router;
use rate_gate::config::parse_config;
use rate_gate::{Decision, Middleware, MiddlewareOption};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;

mod common;

use common::{app, MockLimiter};

/// Serve `router` on an ephemeral port with connection info attached.
async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_peer_address_is_default_key() {
    let limiter = MockLimiter::always(Decision::Allowed(None));
    let (router, hits) = app(Middleware::new(limiter.clone(), Vec::<MiddlewareOption>::new()));
    let addr = spawn_server(router).await;

    let res = client().get(format!("http://{}/", addr)).send().await.expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");
    assert_eq!(limiter.calls_for("127.0.0.1"), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_limit_reached_over_the_wire() {
    let limiter = MockLimiter::always(Decision::LimitExceeded(None));
    let (router, hits) = app(Middleware::new(limiter, Vec::<MiddlewareOption>::new()));
    let addr = spawn_server(router).await;

    let res = client().get(format!("http://{}/", addr)).send().await.unwrap();

    assert_eq!(res.status(), 429);
    assert_eq!(res.text().await.unwrap(), "Limit exceeded");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_abort_is_observable_by_host_panic_layer() {
    let limiter = MockLimiter::failing();
    let (router, hits) = app(Middleware::new(limiter, Vec::<MiddlewareOption>::new()));
    let addr = spawn_server(router.layer(CatchPanicLayer::new())).await;

    let res = client().get(format!("http://{}/", addr)).send().await.unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_config_driven_middleware() {
    let config = parse_config(
        r#"
        excluded_keys = ["127.0.0.1"]
        on_error = "reject"
        "#,
    )
    .unwrap();

    // Loopback is excluded: the failing limiter is never consulted
    let limiter = MockLimiter::failing();
    let (router, hits) = app(Middleware::from_config(limiter.clone(), &config));
    let addr = spawn_server(router).await;

    for _ in 0..3 {
        let res = client().get(format!("http://{}/", addr)).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }
    assert_eq!(limiter.total_calls(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    // Without the exclusion the reject policy answers 503
    let config = parse_config("on_error = \"reject\"").unwrap();
    let (router, _) = app(Middleware::from_config(MockLimiter::failing(), &config));
    let addr = spawn_server(router).await;

    let res = client().get(format!("http://{}/", addr)).send().await.unwrap();
    assert_eq!(res.status(), 503);
    assert_eq!(res.text().await.unwrap(), "Rate limiter unavailable");
}
