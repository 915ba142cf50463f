//! Config frame producer over the recorded config stream
//!
//! An explicitly constructed service instance: it owns its publisher and
//! starts recording the config stream at construction, so every frame it
//! sends is retained for replay by late-joining consumers. The default
//! catalog seeds well-known currencies and tiers, then the load-complete
//! sentinel marks the end of bootstrap data.

use anyhow::{Context, Result};
use codec::{encode_client_tier_config, encode_config_load_complete, encode_currency_config};
use refdata::tier;
use runtime::{epoch_millis, BackoffIdleStrategy, RetryingPublisher};
use transport::{IpcBus, RecordingId};
use types::{
    ClientTierConfigMsg, ClientTierLevel, ConfigLoadCompleteMsg, CurrencyConfigMsg, StreamId,
    SYMBOL_CAP,
};
use tracing::info;
use zerocopy::FromZeroes;

/// Well-known currency catalog: (id, code, spot/forward/amount precision)
const CURRENCY_CATALOG: [(u32, &str, u8, u8, u8); 8] = [
    (1, "USD", 2, 4, 0),
    (2, "EUR", 2, 4, 0),
    (3, "JPY", 0, 2, 0),
    (4, "GBP", 2, 4, 0),
    (5, "CHF", 2, 4, 0),
    (6, "AUD", 2, 4, 0),
    (7, "NZD", 2, 4, 0),
    (8, "CAD", 2, 4, 0),
];

fn currency_msg(id: u32, code: &str, spot: u8, forward: u8, amount: u8) -> CurrencyConfigMsg {
    let mut msg = CurrencyConfigMsg::new_zeroed();
    msg.id = id;
    msg.spot_precision = spot;
    msg.forward_precision = forward;
    msg.amount_precision = amount;
    let len = code.len().min(SYMBOL_CAP);
    msg.symbol[..len].copy_from_slice(&code.as_bytes()[..len]);
    msg.symbol_len = len as u8;
    msg
}

/// Publisher of currency and tier configuration frames
pub struct ConfigService {
    publisher: RetryingPublisher,
    recording: RecordingId,
    buf: [u8; 256],
}

impl ConfigService {
    /// Connect to the bus and start recording the config stream
    pub fn new(bus: &IpcBus, channel: &str) -> Self {
        let recording = bus.start_recording(channel, StreamId::Config.code());
        let publisher = RetryingPublisher::new(
            bus.publish(channel, StreamId::Config.code()),
            Box::new(BackoffIdleStrategy::default()),
        );
        Self {
            publisher,
            recording,
            buf: [0; 256],
        }
    }

    pub fn recording(&self) -> RecordingId {
        self.recording
    }

    pub fn send_currency(&mut self, msg: &CurrencyConfigMsg) -> Result<()> {
        let len = encode_currency_config(&mut self.buf, 0, msg)
            .context("currency config encode failed")?;
        self.publisher
            .publish(&self.buf[..len])
            .context("currency config offer failed")?;
        Ok(())
    }

    pub fn send_tier(&mut self, msg: &ClientTierConfigMsg) -> Result<()> {
        let len = encode_client_tier_config(&mut self.buf, 0, msg)
            .context("client tier config encode failed")?;
        self.publisher
            .publish(&self.buf[..len])
            .context("client tier config offer failed")?;
        Ok(())
    }

    pub fn send_load_complete(&mut self) -> Result<()> {
        let msg = ConfigLoadCompleteMsg {
            timestamp: epoch_millis(),
        };
        let len = encode_config_load_complete(&mut self.buf, 0, &msg)
            .context("load complete encode failed")?;
        self.publisher
            .publish(&self.buf[..len])
            .context("load complete offer failed")?;
        Ok(())
    }

    /// Publish the default currency and tier catalog, then the sentinel
    pub fn seed_defaults(&mut self) -> Result<()> {
        for (id, code, spot, forward, amount) in CURRENCY_CATALOG {
            self.send_currency(&currency_msg(id, code, spot, forward, amount))?;
        }
        for level in ClientTierLevel::ALL {
            self.send_tier(&tier::bootstrap_msg(level))?;
        }
        self.send_load_complete()?;
        info!(
            currencies = CURRENCY_CATALOG.len(),
            tiers = ClientTierLevel::ALL.len(),
            "default configuration catalog published"
        );
        Ok(())
    }
}
