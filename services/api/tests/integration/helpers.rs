use std::time::Duration;

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;

use probe_api::router::build_router;
use probe_api::state::AppState;
use probe_core::health::DependencyProbe;
use probe_core::middleware::{MiddlewareConfig, apply_middleware};
use probe_testing::probe::MockProbe;

pub const READINESS_TIMEOUT: Duration = Duration::from_millis(200);

pub fn middleware_config() -> MiddlewareConfig {
    MiddlewareConfig {
        request_timeout: Duration::from_secs(2),
        trust_proxy_headers: true,
    }
}

pub fn test_server<P>(dependency: Option<P>) -> TestServer
where
    P: DependencyProbe + Clone,
{
    test_server_with(dependency, READINESS_TIMEOUT, &middleware_config())
}

pub fn test_server_with<P>(
    dependency: Option<P>,
    readiness_timeout: Duration,
    middleware: &MiddlewareConfig,
) -> TestServer
where
    P: DependencyProbe + Clone,
{
    let state = AppState::new(dependency, readiness_timeout);
    TestServer::new(build_router(state, middleware)).unwrap()
}

pub fn server_without_dependency() -> TestServer {
    test_server::<MockProbe>(None)
}

/// The service router plus a route whose handler always panics.
pub fn server_with_panicking_route() -> TestServer {
    let state = AppState::new(Some(MockProbe::healthy()), READINESS_TIMEOUT);
    let panicking = apply_middleware(Router::new().route("/boom", get(boom)), &middleware_config());
    TestServer::new(build_router(state, &middleware_config()).merge(panicking)).unwrap()
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}
