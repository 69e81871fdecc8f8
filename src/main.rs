use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use learning_dashboard::config::Config;
use learning_dashboard::{server, AppContext};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::parse();
    info!("Learning dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let ctx = AppContext::load(&config).context("failed to load dashboard inputs")?;

    server::run(ctx, &config)
        .await
        .context("dashboard server stopped with an error")?;

    info!("Shutting down");
    Ok(())
}
