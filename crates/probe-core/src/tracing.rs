use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "info";

/// Initialize structured stdout tracing. Call once at service startup.
/// Emits one JSON object per line; verbosity comes from `RUST_LOG`.
///
/// Safe to call multiple times — subsequent calls are silently ignored.
pub fn init_tracing() {
    let filter = env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}

/// Build the filter from `RUST_LOG`. Unset, blank or unparsable directives
/// fall back to `info` so access logs are never silenced by a typo.
fn env_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
