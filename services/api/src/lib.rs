pub mod config;
pub mod handlers;
pub mod infra;
pub mod router;
pub mod server;
pub mod state;
