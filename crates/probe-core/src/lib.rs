//! Shared building blocks for probe services: the status payload, the
//! dependency probe seam, request decorators, and startup helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod tracing;
