use anyhow::Context as _;
use tracing::{error, info};

use probe_core::config::Config;
use probe_core::tracing::init_tracing;

use probe_api::config::ApiConfig;
use probe_api::infra::db;
use probe_api::router::build_router;
use probe_api::server::{bind, serve, shutdown_signal};
use probe_api::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "api exited");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    info!(?config, "configuration loaded");

    let dependency = match &config.database_url {
        Some(url) => db::connect(url, config.readiness_timeout).await,
        None => {
            info!("DATABASE_URL not set; readiness will report not-ready");
            None
        }
    };

    let state = AppState::new(dependency, config.readiness_timeout);
    let router = build_router(state, &config.middleware());

    let addr = config.listen_addr();
    let listener = bind(addr).await?;

    info!("api listening on {addr}");
    serve(listener, router, shutdown_signal()).await?;
    info!("api stopped");
    Ok(())
}
