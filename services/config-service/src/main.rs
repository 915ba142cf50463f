//! Config Service Entry Point
//!
//! Seeds the default configuration catalog onto the recorded config stream,
//! then stays alive serving replay and emitting heartbeats.

use anyhow::{Context, Result};
use config_service::{ConfigService, ConfigServiceConfig};
use runtime::{AgentRunner, BackoffIdleStrategy, HeartbeatAgent, MultiStreamPoller};
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

    let config_path = std::env::var("CONFIG_SERVICE_CONFIG_PATH")
        .unwrap_or_else(|_| "configs/config-service.toml".into());
    let config = ConfigServiceConfig::load(Path::new(&config_path))
        .context("failed to load config service configuration")?;
    info!(?config, "starting config service");

    let bus = IpcBus::connect(&config.bus_dir);
    let mut service = ConfigService::new(&bus, &config.channel);
    service
        .seed_defaults()
        .context("failed to seed default configuration")?;

    let heartbeat = HeartbeatAgent::new(
        AppId::ConfigService,
        Duration::from_millis(config.heartbeat_interval_ms),
        bus.publish(&config.channel, StreamId::Heartbeat.code()),
    );
    let mut poller = MultiStreamPoller::new("config-service");
    poller.add(Box::new(heartbeat));
    let runner = AgentRunner::start(poller, BackoffIdleStrategy::default())
        .context("failed to start config service scheduler")?;

    info!("config service running, Ctrl+C to stop");
    signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("shutting down config service");
    runner.join();
    bus.shutdown();
    Ok(())
}
