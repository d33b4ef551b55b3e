//! Request decorators applied to every route.
//!
//! Order, outermost first, as stacked in `apply_middleware`: request id,
//! client address, access log, panic recovery, deadline. The access log sits
//! outside recovery and the deadline so that 500 and 504 responses are logged
//! like any other. Keep this list in step with the `ServiceBuilder` below.

use std::any::Any;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tower::{BoxError, ServiceBuilder};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::{
    DefaultOnBodyChunk, DefaultOnEos, HttpMakeClassifier, MakeSpan, OnResponse, TraceLayer,
};
use tracing::Span;
use uuid::Uuid;

use crate::error::AppError;
use crate::health::millis;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Settings for the decorator chain.
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    /// Wall-clock deadline for a whole request.
    pub request_timeout: Duration,
    /// Honor `True-Client-IP` / `X-Real-IP` / `X-Forwarded-For`.
    pub trust_proxy_headers: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            trust_proxy_headers: true,
        }
    }
}

/// Wrap every route of `router` in the decorator chain.
pub fn apply_middleware(router: Router, config: &MiddlewareConfig) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(request_id_layer())
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(middleware::from_fn_with_state(
                config.trust_proxy_headers,
                client_ip,
            ))
            .layer(access_log_layer())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(HandleErrorLayer::new(timeout_response))
            .layer(tower::timeout::TimeoutLayer::new(config.request_timeout)),
    )
}

// ── Request id ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Assigns `x-request-id` unless the caller already sent one.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), MakeUuidRequestId)
}

// ── Client address ───────────────────────────────────────────────────────────

/// Originating client address, stored as a request extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub Option<IpAddr>);

const CLIENT_IP_HEADERS: [&str; 3] = ["true-client-ip", "x-real-ip", "x-forwarded-for"];

/// Resolve the client address from proxy headers, falling back to the peer.
///
/// For `X-Forwarded-For` only the first (client-most) entry is considered.
/// Values that do not parse as an IP address are skipped.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<IpAddr>,
    trust_proxy_headers: bool,
) -> Option<IpAddr> {
    if trust_proxy_headers {
        let forwarded = CLIENT_IP_HEADERS.iter().find_map(|name| {
            let value = headers.get(*name)?.to_str().ok()?;
            value.split(',').next()?.trim().parse::<IpAddr>().ok()
        });
        if forwarded.is_some() {
            return forwarded;
        }
    }
    peer
}

async fn client_ip(
    State(trust_proxy_headers): State<bool>,
    mut request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let ip = resolve_client_ip(request.headers(), peer, trust_proxy_headers);
    request.extensions_mut().insert(ClientIp(ip));
    next.run(request).await
}

// ── Access log ───────────────────────────────────────────────────────────────

pub type AccessLogLayer = TraceLayer<
    HttpMakeClassifier,
    AccessLogSpan,
    (),
    AccessLogLine,
    DefaultOnBodyChunk,
    DefaultOnEos,
    (),
>;

/// One `info` line per completed request, inside a span carrying the
/// request's method, path, id and client address.
pub fn access_log_layer() -> AccessLogLayer {
    TraceLayer::new_for_http()
        .make_span_with(AccessLogSpan)
        .on_request(())
        .on_response(AccessLogLine)
        .on_failure(())
}

#[derive(Debug, Clone, Copy)]
pub struct AccessLogSpan;

impl<B> MakeSpan<B> for AccessLogSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        let client_ip = match request.extensions().get::<ClientIp>() {
            Some(ClientIp(Some(ip))) => ip.to_string(),
            _ => "-".to_owned(),
        };
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id,
            client_ip = %client_ip
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AccessLogLine;

impl<B> OnResponse<B> for AccessLogLine {
    fn on_response(self, response: &axum::http::Response<B>, latency: Duration, _span: &Span) {
        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = millis(latency),
            "request completed"
        );
    }
}

// ── Panic recovery ───────────────────────────────────────────────────────────

/// Convert a handler panic into a generic 500. The payload is logged, never returned.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = detail, "handler panicked");
    AppError::Panic.into_response()
}

// ── Deadline ─────────────────────────────────────────────────────────────────

/// Map errors from the deadline layer. The timed-out handler future has
/// already been dropped by the time this runs.
pub async fn timeout_response(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::Timeout
    } else {
        AppError::Internal(anyhow::anyhow!(err))
    }
}
