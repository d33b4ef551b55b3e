use std::time::Duration;

/// Shared application state passed to every handler via axum `State`.
///
/// `dependency` is `None` when no database is configured or the pool could
/// not be created; readiness then always reports not-ready.
#[derive(Clone)]
pub struct AppState<P> {
    pub dependency: Option<P>,
    pub readiness_timeout: Duration,
}

impl<P> AppState<P> {
    pub fn new(dependency: Option<P>, readiness_timeout: Duration) -> Self {
        Self {
            dependency,
            readiness_timeout,
        }
    }
}
