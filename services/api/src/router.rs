use axum::{Router, routing::get};

use probe_core::error::not_found;
use probe_core::health::{DependencyProbe, healthz};
use probe_core::middleware::{MiddlewareConfig, apply_middleware};

use crate::handlers::probes::readyz;
use crate::state::AppState;

pub fn build_router<P>(state: AppState<P>, middleware: &MiddlewareConfig) -> Router
where
    P: DependencyProbe + Clone,
{
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<P>))
        .fallback(not_found)
        .with_state(state);
    apply_middleware(router, middleware)
}
