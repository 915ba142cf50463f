//! Pricing engine core: two scheduler threads and their wiring
//!
//! One thread runs the configuration agent (replay first, then live) plus
//! the heartbeat; the other runs the quote pricing pipe. The two sides meet
//! only at the published tier snapshots.

use crate::config::PricingEngineConfig;
use crate::pipe::QuotePricerPipe;
use anyhow::{Context, Result};
use refdata::{ConfigAgent, CurrencySnapshots, TierSnapshots};
use runtime::{
    AgentRunner, BackoffIdleStrategy, HeartbeatAgent, MultiStreamPoller, RetryingPublisher,
};
use std::time::Duration;
use tracing::info;
use transport::{IpcBus, Subscription};
use types::{AppId, ClientTierLevel, StreamId};

pub struct CoreEventLoop {
    config_runner: AgentRunner,
    pricing_runner: AgentRunner,
}

/// Locate the config stream recording, if any process has recorded one
fn config_replay(bus: &IpcBus) -> Option<Box<dyn Subscription>> {
    let recording = bus
        .list_recordings()
        .into_iter()
        .find(|info| info.stream_id == StreamId::Config.code())?;
    info!(recording = recording.id.0, frames = recording.frame_count, "replaying config log");
    bus.replay(recording.id, 0).ok()
}

impl CoreEventLoop {
    pub fn start(bus: &IpcBus, config: &PricingEngineConfig) -> Result<Self> {
        let tier_snapshots = TierSnapshots::new();
        let currency_snapshots = CurrencySnapshots::new();

        let config_agent = ConfigAgent::new(
            config_replay(bus),
            bus.subscribe(&config.channel, StreamId::Config.code()),
            currency_snapshots,
            tier_snapshots.clone(),
        )
        .context("failed to build config agent")?;
        let heartbeat = HeartbeatAgent::new(
            AppId::PricingEngine,
            Duration::from_millis(config.heartbeat_interval_ms),
            bus.publish(&config.channel, StreamId::Heartbeat.code()),
        );
        let mut config_poller = MultiStreamPoller::new("pricing-config");
        config_poller.add(Box::new(config_agent));
        config_poller.add(Box::new(heartbeat));

        let publishers = ClientTierLevel::ALL.map(|level| {
            RetryingPublisher::new(
                bus.publish(&config.channel, StreamId::market_quote_for(level)),
                Box::new(BackoffIdleStrategy::default()),
            )
        });
        let pipe = QuotePricerPipe::new(
            bus.subscribe(&config.channel, StreamId::RawQuote.code()),
            tier_snapshots,
            publishers,
        );
        let mut pricing_poller = MultiStreamPoller::new("pricing-pipe");
        pricing_poller.add(Box::new(pipe));

        Ok(Self {
            config_runner: AgentRunner::start(config_poller, BackoffIdleStrategy::default())
                .context("failed to start config scheduler")?,
            pricing_runner: AgentRunner::start(pricing_poller, BackoffIdleStrategy::default())
                .context("failed to start pricing scheduler")?,
        })
    }

    pub fn shutdown(self) {
        self.pricing_runner.join();
        self.config_runner.join();
    }
}
