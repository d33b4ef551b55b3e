use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use probe_core::config::{Config, ConfigError, flag_or, non_empty, parse_or};
use probe_core::middleware::MiddlewareConfig;

/// API service configuration loaded from environment variables.
pub struct ApiConfig {
    /// TCP port to listen on (default 8080). Env var: `PORT`.
    pub port: u16,
    /// PostgreSQL connection URL. Unset disables readiness. Env var: `DATABASE_URL`.
    pub database_url: Option<String>,
    /// Deadline for a whole request (default 10s). Env var: `REQUEST_TIMEOUT_SECS`.
    pub request_timeout: Duration,
    /// Deadline for one readiness ping (default 1000ms). Env var: `READINESS_TIMEOUT_MS`.
    pub readiness_timeout: Duration,
    /// Honor client-address proxy headers (default true). Env var: `TRUST_PROXY_HEADERS`.
    pub trust_proxy_headers: bool,
}

impl Config for ApiConfig {
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: parse_or(&lookup, "PORT", 8080)?,
            database_url: non_empty(&lookup, "DATABASE_URL"),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10)?),
            readiness_timeout: Duration::from_millis(parse_or(
                &lookup,
                "READINESS_TIMEOUT_MS",
                1000,
            )?),
            trust_proxy_headers: flag_or(&lookup, "TRUST_PROXY_HEADERS", true)?,
        })
    }
}

impl ApiConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn middleware(&self) -> MiddlewareConfig {
        MiddlewareConfig {
            request_timeout: self.request_timeout,
            trust_proxy_headers: self.trust_proxy_headers,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("readiness_timeout", &self.readiness_timeout)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .finish()
    }
}
