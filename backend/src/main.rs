use std::sync::Arc;

use anyhow::Context;
use littlesteps_backend::config::AppConfig;
use littlesteps_backend::{create_router, initialize_backend};
use mockable::DefaultClock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    match &config.source {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("No configuration file found, using defaults and environment"),
    }

    let state = initialize_backend(&config, Arc::new(DefaultClock)).await?;
    let app = create_router(state, &config.cors_origins);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("LittleSteps backend listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
