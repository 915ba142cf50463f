//! Market Data Service Entry Point
//!
//! Runs the stochastic FX generator and a heartbeat agent on one scheduler
//! thread, publishing raw quotes on the RAW_QUOTE stream.

use anyhow::{Context, Result};
use market_data::{FxPriceGenerator, MarketDataConfig};
use runtime::{
    AgentRunner, BackoffIdleStrategy, HeartbeatAgent, MultiStreamPoller, RetryingPublisher,
};
use std::path::Path;
use std::time::Duration;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transport::IpcBus;
use types::{AppId, StreamId};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config_path =
        std::env::var("MARKET_DATA_CONFIG_PATH").unwrap_or_else(|_| "configs/market-data.toml".into());
    let config = MarketDataConfig::load(Path::new(&config_path))
        .context("failed to load market data configuration")?;
    info!(?config, "starting market data service");

    let bus = IpcBus::connect(&config.bus_dir);

    let quote_publisher = RetryingPublisher::new(
        bus.publish(&config.channel, StreamId::RawQuote.code()),
        Box::new(BackoffIdleStrategy::default()),
    );
    let generator = FxPriceGenerator::new(quote_publisher, config.ticks_per_second);

    let heartbeat = HeartbeatAgent::new(
        AppId::MarketData,
        Duration::from_millis(config.heartbeat_interval_ms),
        bus.publish(&config.channel, StreamId::Heartbeat.code()),
    );

    let mut poller = MultiStreamPoller::new("market-data");
    poller.add(Box::new(generator));
    poller.add(Box::new(heartbeat));

    let runner = AgentRunner::start(poller, BackoffIdleStrategy::default())
        .context("failed to start market data scheduler")?;

    info!("market data service running, Ctrl+C to stop");
    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("shutting down market data service");
    runner.join();
    bus.shutdown();
    Ok(())
}
