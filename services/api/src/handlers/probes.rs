use axum::extract::State;

use probe_core::health::{DependencyProbe, ProbeStatus, check_readiness};

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

/// Readiness: one bounded ping of the dependency. If the request itself is
/// abandoned (client gone or deadline hit) this future is dropped and the
/// ping with it.
pub async fn readyz<P>(State(state): State<AppState<P>>) -> ProbeStatus
where
    P: DependencyProbe + Clone,
{
    check_readiness(state.dependency.as_ref(), state.readiness_timeout).await
}
