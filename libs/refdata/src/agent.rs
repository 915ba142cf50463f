//! Configuration agent: replay the durable log, then apply live updates
//!
//! The agent polls the replay subscription until it is exhausted, then
//! switches to the live config stream. A `ConfigLoadComplete` sentinel seen
//! while still awaiting bootstrap records the bootstrap timestamp and flips
//! the state once; config frames keep applying afterwards. Validation
//! failures and undecodable frames are logged and skipped, never escalated
//! out of the polling cycle.

use crate::cache::{ClientTierCache, CurrencyCache};
use crate::snapshot::{CurrencySnapshots, TierSnapshots};
use codec::{decode_frame, Frame};
use runtime::{PoolError, Worker};
use transport::Subscription;
use tracing::{debug, info, warn};

const FRAGMENT_LIMIT: usize = 10;

/// Bootstrap progress; terminal for the flag, not for processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    AwaitingBootstrap,
    Bootstrapped { at: u64 },
}

/// The agent's single-writer state: caches, snapshots, bootstrap flag
pub struct ConfigStore {
    currencies: CurrencyCache,
    tiers: ClientTierCache,
    currency_snapshots: CurrencySnapshots,
    tier_snapshots: TierSnapshots,
    state: BootstrapState,
}

impl ConfigStore {
    pub fn new(
        currency_snapshots: CurrencySnapshots,
        tier_snapshots: TierSnapshots,
    ) -> Result<Self, PoolError> {
        let tiers = ClientTierCache::with_bootstrap_defaults()?;
        let store = Self {
            currencies: CurrencyCache::new()?,
            tiers,
            currency_snapshots,
            tier_snapshots,
            state: BootstrapState::AwaitingBootstrap,
        };
        // pre-seeded defaults are readable before any frame arrives
        for tier_id in 1..=4 {
            if let Some(entry) = store.tiers.get(tier_id) {
                store.tier_snapshots.publish(entry);
            }
        }
        Ok(store)
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    pub fn is_bootstrapped(&self) -> bool {
        matches!(self.state, BootstrapState::Bootstrapped { .. })
    }

    pub fn currency(&self, id: u32) -> Option<&crate::CurrencyConfig> {
        self.currencies.get(id)
    }

    pub fn tier(&self, tier_id: u16) -> Option<&crate::ClientTierConfig> {
        self.tiers.get(tier_id)
    }

    fn on_frame(&mut self, frame: &[u8]) {
        match decode_frame(frame) {
            Ok(Frame::CurrencyConfig(msg)) => match self.currencies.apply_update(&msg) {
                Ok(entry) => self.currency_snapshots.publish(entry),
                Err(err) => warn!(error = %err, "currency update rejected"),
            },
            Ok(Frame::ClientTierConfig(msg)) => match self.tiers.apply_update(&msg) {
                Ok(entry) => self.tier_snapshots.publish(entry),
                Err(err) => warn!(error = %err, "client tier update rejected"),
            },
            Ok(Frame::ConfigLoadComplete(msg)) => {
                if self.state == BootstrapState::AwaitingBootstrap {
                    self.state = BootstrapState::Bootstrapped { at: msg.timestamp };
                    info!(
                        at = msg.timestamp,
                        currencies = self.currencies.len(),
                        tiers = self.tiers.len(),
                        "configuration bootstrap complete"
                    );
                }
            }
            Ok(other) => debug!(frame = ?other, "unexpected frame on config stream"),
            Err(err) if err.is_skippable() => {
                warn!(error = %err, "skipping undecodable config frame")
            }
            Err(err) => warn!(error = %err, "config frame decode failed"),
        }
    }
}

/// Worker polling the config log (replay first, then live)
pub struct ConfigAgent {
    store: ConfigStore,
    replay: Option<Box<dyn Subscription>>,
    live: Box<dyn Subscription>,
}

impl ConfigAgent {
    pub fn new(
        replay: Option<Box<dyn Subscription>>,
        live: Box<dyn Subscription>,
        currency_snapshots: CurrencySnapshots,
        tier_snapshots: TierSnapshots,
    ) -> Result<Self, PoolError> {
        Ok(Self {
            store: ConfigStore::new(currency_snapshots, tier_snapshots)?,
            replay,
            live,
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }
}

impl Worker for ConfigAgent {
    fn do_work(&mut self) -> usize {
        let store = &mut self.store;
        if let Some(replay) = self.replay.as_mut() {
            let polled = replay.poll(&mut |frame| store.on_frame(frame), FRAGMENT_LIMIT);
            if polled == 0 && !replay.is_connected() {
                info!("config replay exhausted, switching to live stream");
                self.replay = None;
            }
            return polled;
        }
        self.live
            .poll(&mut |frame| store.on_frame(frame), FRAGMENT_LIMIT)
    }

    fn role_name(&self) -> &str {
        "config-agent"
    }

    fn on_close(&mut self) {
        if let Some(replay) = self.replay.as_mut() {
            replay.close();
        }
        self.live.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tier;
    use codec::{encode_client_tier_config, encode_config_load_complete, encode_currency_config};
    use transport::IpcBus;
    use types::{ClientTierLevel, ConfigLoadCompleteMsg, CurrencyConfigMsg, StreamId};
    use zerocopy::FromZeroes;

    const CHANNEL: &str = "ipc:fxgrid";

    fn usd_msg() -> CurrencyConfigMsg {
        let mut msg = CurrencyConfigMsg::new_zeroed();
        msg.id = 1;
        msg.spot_precision = 2;
        msg.forward_precision = 4;
        msg.symbol[..3].copy_from_slice(b"USD");
        msg.symbol_len = 3;
        msg
    }

    fn offer_currency(bus: &IpcBus, msg: &CurrencyConfigMsg) {
        let mut buf = [0u8; 64];
        let len = encode_currency_config(&mut buf, 0, msg).unwrap();
        bus.publish(CHANNEL, StreamId::Config.code())
            .offer(&buf[..len])
            .unwrap();
    }

    fn offer_load_complete(bus: &IpcBus, timestamp: u64) {
        let mut buf = [0u8; 32];
        let len =
            encode_config_load_complete(&mut buf, 0, &ConfigLoadCompleteMsg { timestamp }).unwrap();
        bus.publish(CHANNEL, StreamId::Config.code())
            .offer(&buf[..len])
            .unwrap();
    }

    fn live_agent(bus: &IpcBus) -> ConfigAgent {
        ConfigAgent::new(
            None,
            bus.subscribe(CHANNEL, StreamId::Config.code()),
            CurrencySnapshots::new(),
            TierSnapshots::new(),
        )
        .unwrap()
    }

    #[test]
    fn bootstrap_flips_once_on_load_complete() {
        let bus = IpcBus::connect("agent-test");
        let mut agent = live_agent(&bus);
        assert!(!agent.store().is_bootstrapped());

        offer_currency(&bus, &usd_msg());
        offer_load_complete(&bus, 777);
        offer_load_complete(&bus, 999);
        while agent.do_work() > 0 {}

        assert_eq!(
            agent.store().state(),
            BootstrapState::Bootstrapped { at: 777 }
        );
        assert_eq!(agent.store().currency(1).unwrap().symbol, "USD");
    }

    #[test]
    fn updates_keep_applying_after_bootstrap() {
        let bus = IpcBus::connect("agent-test");
        let mut agent = live_agent(&bus);

        offer_load_complete(&bus, 1);
        while agent.do_work() > 0 {}
        assert!(agent.store().is_bootstrapped());

        offer_currency(&bus, &usd_msg());
        while agent.do_work() > 0 {}
        assert_eq!(agent.store().currency(1).unwrap().symbol, "USD");
    }

    #[test]
    fn invalid_update_is_dropped_without_crashing_the_worker() {
        let bus = IpcBus::connect("agent-test");
        let snapshots = TierSnapshots::new();
        let mut agent = ConfigAgent::new(
            None,
            bus.subscribe(CHANNEL, StreamId::Config.code()),
            CurrencySnapshots::new(),
            snapshots.clone(),
        )
        .unwrap();

        let mut bad = tier::bootstrap_msg(ClientTierLevel::Gold);
        bad.min_notional = 2.0;
        bad.max_notional = 1.0;
        let mut buf = [0u8; 256];
        let len = encode_client_tier_config(&mut buf, 0, &bad).unwrap();
        bus.publish(CHANNEL, StreamId::Config.code())
            .offer(&buf[..len])
            .unwrap();

        while agent.do_work() > 0 {}
        // bootstrap default survives the rejected update
        assert_eq!(agent.store().tier(3).unwrap().max_notional, 50_000_000.0);
    }

    #[test]
    fn unknown_template_is_skipped() {
        let bus = IpcBus::connect("agent-test");
        let mut agent = live_agent(&bus);

        let mut buf = [0u8; 64];
        let len = encode_currency_config(&mut buf, 0, &usd_msg()).unwrap();
        buf[2] = 42; // corrupt the template id
        bus.publish(CHANNEL, StreamId::Config.code())
            .offer(&buf[..len])
            .unwrap();
        offer_currency(&bus, &usd_msg());

        while agent.do_work() > 0 {}
        assert_eq!(agent.store().currency(1).unwrap().symbol, "USD");
    }

    #[test]
    fn replay_is_drained_before_live_frames() {
        let bus = IpcBus::connect("agent-test");
        let recording = bus.start_recording(CHANNEL, StreamId::Config.code());
        offer_currency(&bus, &usd_msg());
        offer_load_complete(&bus, 55);

        // live subscription joins at the tail: a fresh agent would miss the
        // two frames above without the replay pass
        let snapshots = CurrencySnapshots::new();
        let mut agent = ConfigAgent::new(
            Some(bus.replay(recording, 0).unwrap()),
            bus.subscribe(CHANNEL, StreamId::Config.code()),
            snapshots.clone(),
            TierSnapshots::new(),
        )
        .unwrap();

        while agent.do_work() > 0 {}
        agent.do_work(); // observe replay exhaustion and switch
        assert!(agent.store().is_bootstrapped());
        assert_eq!(snapshots.get(1).unwrap().symbol, "USD");

        let mut eur = usd_msg();
        eur.id = 2;
        eur.symbol[..3].copy_from_slice(b"EUR");
        offer_currency(&bus, &eur);
        while agent.do_work() > 0 {}
        assert_eq!(agent.store().currency(2).unwrap().symbol, "EUR");
    }

    #[test]
    fn bootstrap_defaults_are_published_before_any_frame() {
        let bus = IpcBus::connect("agent-test");
        let tier_snapshots = TierSnapshots::new();
        let _agent = ConfigAgent::new(
            None,
            bus.subscribe(CHANNEL, StreamId::Config.code()),
            CurrencySnapshots::new(),
            tier_snapshots.clone(),
        )
        .unwrap();
        assert_eq!(tier_snapshots.len(), 4);
        assert_eq!(tier_snapshots.get(3).unwrap().tier_name, "GOLD");
    }
}
