use std::future::Future;
use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Value of the `status` field in every probe response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeStatus {
    Ok,
    Ready,
    NotReady,
}

impl ProbeStatus {
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::Ok | Self::Ready => StatusCode::OK,
            Self::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// JSON body of a probe response: `{"status":"..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub status: ProbeStatus,
}

impl IntoResponse for ProbeStatus {
    fn into_response(self) -> Response {
        (self.http_status(), Json(StatusResponse { status: self })).into_response()
    }
}

/// An external dependency whose reachability gates readiness.
///
/// Implementations must be cheap to share across concurrent requests; any
/// pooling is the implementation's own concern. Dropping the returned future
/// must abandon the ping.
pub trait DependencyProbe: Send + Sync + 'static {
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Handler for `GET /healthz` — liveness check.
pub async fn healthz() -> ProbeStatus {
    ProbeStatus::Ok
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Run a single bounded ping against `dependency`.
///
/// Without a dependency the service is never ready. Errors and timeouts are
/// logged and collapse to `NotReady`; nothing is retried.
pub async fn check_readiness<P>(dependency: Option<&P>, timeout: Duration) -> ProbeStatus
where
    P: DependencyProbe,
{
    let Some(dependency) = dependency else {
        return ProbeStatus::NotReady;
    };
    match tokio::time::timeout(timeout, dependency.ping()).await {
        Ok(Ok(())) => ProbeStatus::Ready,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "dependency ping failed");
            ProbeStatus::NotReady
        }
        Err(_) => {
            tracing::warn!(timeout_ms = millis(timeout), "dependency ping timed out");
            ProbeStatus::NotReady
        }
    }
}
