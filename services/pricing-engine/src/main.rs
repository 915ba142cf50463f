//! Pricing Engine Service Entry Point

use anyhow::{Context, Result};
use pricing_engine::{CoreEventLoop, PricingEngineConfig};
use std::path::Path;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transport::IpcBus;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path = std::env::var("PRICING_ENGINE_CONFIG_PATH")
        .unwrap_or_else(|_| "configs/pricing-engine.toml".into());
    let config = PricingEngineConfig::load(Path::new(&config_path))
        .context("failed to load pricing engine configuration")?;
    info!(?config, "starting pricing engine");

    let bus = IpcBus::connect(&config.bus_dir);
    let core = CoreEventLoop::start(&bus, &config)?;

    info!("pricing engine running, Ctrl+C to stop");
    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("shutting down pricing engine");
    core.shutdown();
    Ok(())
}
