use std::net::{Ipv4Addr, SocketAddr};

use probe_api::config::ApiConfig;
use probe_api::router::build_router;
use probe_api::server::{bind, serve};
use probe_api::state::AppState;
use probe_core::config::Config;
use probe_testing::net::closed_port;
use probe_testing::probe::MockProbe;

use crate::helpers::{READINESS_TIMEOUT, middleware_config};

#[tokio::test]
async fn should_bind_requested_port() {
    let port = closed_port().await;

    let listener = bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
        .await
        .unwrap();

    assert_eq!(listener.local_addr().unwrap().port(), port);
}

#[tokio::test]
async fn should_bind_port_from_environment() {
    let port = closed_port().await.to_string();
    let config = ApiConfig::from_lookup(|key| (key == "PORT").then(|| port.clone())).unwrap();

    let listener = bind(config.listen_addr()).await.unwrap();

    let local = listener.local_addr().unwrap();
    assert_eq!(local.port().to_string(), port);
    assert!(local.ip().is_unspecified());
}

#[tokio::test]
async fn should_fail_when_port_is_taken() {
    let first = bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await.unwrap();
    let taken = first.local_addr().unwrap();

    let err = bind(taken).await.unwrap_err();

    assert!(err.to_string().contains("failed to bind"));
}

#[tokio::test]
async fn should_serve_over_tcp_and_shut_down_gracefully() {
    let listener = bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = build_router(
        AppState::new(Some(MockProbe::healthy()), READINESS_TIMEOUT),
        &middleware_config(),
    );
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, router, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let health = client
        .get(format!("http://{addr}/healthz"))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status().as_u16(), 200);
    assert_eq!(health.text().await.unwrap(), r#"{"status":"ok"}"#);

    let ready = client
        .get(format!("http://{addr}/readyz"))
        .send()
        .await
        .unwrap();
    assert_eq!(ready.status().as_u16(), 200);
    assert_eq!(ready.text().await.unwrap(), r#"{"status":"ready"}"#);

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
