//! Stochastic FX price generator
//!
//! Each currency pair follows a geometric process:
//! `mid *= exp(-0.5 sigma^2 dt + sigma sqrt(dt) Z)` with `Z` standard
//! normal. Pair volatility is the average of the two constituent
//! currencies' annualized volatilities and the pair spread (in basis
//! points) is the max of theirs, falling back to defaults for currencies
//! without an override. Generation is scheduler-driven: `do_work` emits a
//! full sweep of the symbol set once per throttle interval and is a no-op
//! between intervals.

use crate::calendar;
use codec::QuoteWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use runtime::{epoch_nanos, RetryingPublisher, Worker};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use types::{ClientTierLevel, Rung, Symbol, Tenor};

const DEFAULT_VOL: f64 = 0.5;
const DEFAULT_SPREAD_BPS: f64 = 0.5;
const RUNG_VOLUME: u64 = 1_000_000;

/// Annualized volatility and quoted spread for one currency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyParams {
    pub vol: f64,
    pub spread_bps: f64,
}

fn currency_overrides() -> HashMap<&'static str, CurrencyParams> {
    let table = [
        ("USD", 0.020, 0.5),
        ("EUR", 0.018, 0.5),
        ("JPY", 0.030, 1.0),
        ("GBP", 0.025, 0.6),
        ("CHF", 0.017, 0.4),
        ("AUD", 0.028, 0.6),
        ("NZD", 0.030, 0.7),
        ("CAD", 0.022, 0.5),
    ];
    table
        .into_iter()
        .map(|(ccy, vol, spread_bps)| (ccy, CurrencyParams { vol, spread_bps }))
        .collect()
}

/// Majors and crosses seeded at startup, with their initial mids
const SEED_PAIRS: [(&str, f64); 17] = [
    ("EURUSD", 1.1000),
    ("USDJPY", 145.00),
    ("GBPUSD", 1.2500),
    ("USDCHF", 0.8800),
    ("AUDUSD", 0.6600),
    ("NZDUSD", 0.6000),
    ("USDCAD", 1.3600),
    ("EURJPY", 158.00),
    ("EURGBP", 0.8800),
    ("EURCHF", 0.9700),
    ("GBPJPY", 184.50),
    ("AUDJPY", 98.50),
    ("NZDJPY", 90.20),
    ("CADJPY", 107.30),
    ("AUDNZD", 1.0700),
    ("EURCAD", 1.4700),
    ("GBPCHF", 1.1100),
];

/// Converts a target tick rate into a minimum interval between sweeps
#[derive(Debug, Clone, Copy)]
pub struct TickThrottle {
    dt_seconds: f64,
}

impl TickThrottle {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            dt_seconds: 1.0 / ticks_per_second.max(1) as f64,
        }
    }

    /// Time step fed into the price process
    pub fn dt_seconds(&self) -> f64 {
        self.dt_seconds
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.dt_seconds)
    }
}

struct PairModel {
    symbol: Symbol,
    mid: f64,
    vol: f64,
    spread_bps: f64,
}

/// Worker generating one raw quote per pair per throttle interval
pub struct FxPriceGenerator {
    pairs: Vec<PairModel>,
    currencies: HashMap<&'static str, CurrencyParams>,
    throttle: TickThrottle,
    last_sweep: Option<Instant>,
    rng: StdRng,
    publisher: RetryingPublisher,
    buf: [u8; 128],
    closed: bool,
}

impl FxPriceGenerator {
    pub fn new(publisher: RetryingPublisher, ticks_per_second: u32) -> Self {
        Self::with_rng(publisher, ticks_per_second, StdRng::from_entropy())
    }

    /// Deterministic construction for tests
    pub fn with_rng(publisher: RetryingPublisher, ticks_per_second: u32, rng: StdRng) -> Self {
        let mut generator = Self {
            pairs: Vec::new(),
            currencies: currency_overrides(),
            throttle: TickThrottle::new(ticks_per_second),
            last_sweep: None,
            rng,
            publisher,
            buf: [0; 128],
            closed: false,
        };
        for (pair, mid) in SEED_PAIRS {
            if let Ok(symbol) = Symbol::new(pair) {
                generator.add_symbol(symbol, mid);
            }
        }
        generator
    }

    fn currency_params(&self, ccy: &str) -> CurrencyParams {
        self.currencies.get(ccy).copied().unwrap_or(CurrencyParams {
            vol: DEFAULT_VOL,
            spread_bps: DEFAULT_SPREAD_BPS,
        })
    }

    /// Pair parameters inferred from the two constituent currencies
    pub fn inferred_params(&self, symbol: Symbol) -> CurrencyParams {
        let base = self.currency_params(symbol.base_ccy());
        let quote = self.currency_params(symbol.quote_ccy());
        CurrencyParams {
            vol: (base.vol + quote.vol) / 2.0,
            spread_bps: base.spread_bps.max(quote.spread_bps),
        }
    }

    /// Register a pair at runtime with inferred volatility and spread
    pub fn add_symbol(&mut self, symbol: Symbol, initial_mid: f64) {
        let params = self.inferred_params(symbol);
        info!(
            symbol = %symbol,
            mid = initial_mid,
            vol = params.vol,
            spread_bps = params.spread_bps,
            "pair registered"
        );
        self.pairs.push(PairModel {
            symbol,
            mid: initial_mid,
            vol: params.vol,
            spread_bps: params.spread_bps,
        });
    }

    /// Override one live pair's model directly
    pub fn update_model(&mut self, symbol: Symbol, vol: f64, spread_bps: f64) -> bool {
        match self.pairs.iter_mut().find(|p| p.symbol == symbol) {
            Some(pair) => {
                pair.vol = vol;
                pair.spread_bps = spread_bps;
                true
            }
            None => false,
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.pairs.len()
    }

    fn due(&self) -> bool {
        match self.last_sweep {
            Some(at) => at.elapsed() >= self.throttle.interval(),
            None => true,
        }
    }
}

impl Worker for FxPriceGenerator {
    fn do_work(&mut self) -> usize {
        if self.closed || !self.due() {
            return 0;
        }
        self.last_sweep = Some(Instant::now());

        let dt = self.throttle.dt_seconds();
        let value_date = calendar::value_date(calendar::today_epoch_day());
        let mut published = 0;
        for pair in &mut self.pairs {
            let z: f64 = self.rng.sample(StandardNormal);
            pair.mid *= (-0.5 * pair.vol * pair.vol * dt + pair.vol * dt.sqrt() * z).exp();
            let spread = pair.mid * pair.spread_bps / 10_000.0;
            let rung = Rung::new(pair.mid - spread / 2.0, pair.mid + spread / 2.0, RUNG_VOLUME);

            let frame_len = {
                let mut writer = match QuoteWriter::begin(
                    &mut self.buf,
                    0,
                    pair.symbol,
                    value_date,
                    Tenor::Spot.into(),
                    ClientTierLevel::Gold.id(),
                    epoch_nanos(),
                ) {
                    Ok(writer) => writer,
                    Err(err) => {
                        warn!(symbol = %pair.symbol, error = %err, "quote encode failed");
                        continue;
                    }
                };
                if let Err(err) = writer.add_rung(rung) {
                    warn!(symbol = %pair.symbol, error = %err, "rung encode failed");
                    continue;
                }
                writer.encoded_length()
            };

            match self.publisher.publish(&self.buf[..frame_len]) {
                Ok(_) => published += 1,
                Err(err) if err.is_transient() => {
                    warn!(symbol = %pair.symbol, "raw quote dropped under backpressure");
                }
                Err(err) => {
                    warn!(error = %err, "raw quote channel failed, stopping generator");
                    self.closed = true;
                    break;
                }
            }
        }
        published
    }

    fn role_name(&self) -> &str {
        "fx-generator"
    }

    fn on_start(&mut self) {
        info!(
            symbols = self.pairs.len(),
            dt = self.throttle.dt_seconds(),
            "generator starting"
        );
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{decode_frame, Frame};
    use runtime::BusySpinIdleStrategy;
    use transport::{IpcBus, Subscription};
    use types::StreamId;

    const CHANNEL: &str = "ipc:fxgrid";

    fn generator_on(bus: &IpcBus, tps: u32) -> FxPriceGenerator {
        let publisher = RetryingPublisher::new(
            bus.publish(CHANNEL, StreamId::RawQuote.code()),
            Box::new(BusySpinIdleStrategy),
        );
        FxPriceGenerator::with_rng(publisher, tps, StdRng::seed_from_u64(7))
    }

    fn drain(sub: &mut Box<dyn Subscription>) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        while sub.poll(&mut |frame| frames.push(frame.to_vec()), 64) > 0 {}
        frames
    }

    #[test]
    fn throttle_dt_is_inverse_rate() {
        assert_eq!(TickThrottle::new(4).dt_seconds(), 0.25);
        assert_eq!(TickThrottle::new(0).dt_seconds(), 1.0);
    }

    #[test]
    fn seeds_the_full_pair_catalog() {
        let bus = IpcBus::connect("gen-test");
        let generator = generator_on(&bus, 10);
        assert_eq!(generator.symbol_count(), 17);
    }

    #[test]
    fn inferred_params_average_vol_and_max_spread() {
        let bus = IpcBus::connect("gen-test");
        let generator = generator_on(&bus, 10);
        let params = generator.inferred_params(Symbol::new("EURJPY").unwrap());
        assert!((params.vol - 0.024).abs() < 1e-12);
        assert_eq!(params.spread_bps, 1.0);
    }

    #[test]
    fn unknown_currencies_fall_back_to_defaults() {
        let bus = IpcBus::connect("gen-test");
        let generator = generator_on(&bus, 10);
        let params = generator.inferred_params(Symbol::new("XAUXAG").unwrap());
        assert_eq!(params.vol, DEFAULT_VOL);
        assert_eq!(params.spread_bps, DEFAULT_SPREAD_BPS);
    }

    #[test]
    fn sweep_publishes_one_decodable_quote_per_pair() {
        let bus = IpcBus::connect("gen-test");
        let mut sub = bus.subscribe(CHANNEL, StreamId::RawQuote.code());
        let mut generator = generator_on(&bus, 10);

        assert_eq!(generator.do_work(), 17);
        let frames = drain(&mut sub);
        assert_eq!(frames.len(), 17);
        for frame in &frames {
            match decode_frame(frame).unwrap() {
                Frame::Quote(view) => {
                    assert_eq!(view.client_tier(), ClientTierLevel::Gold.id());
                    assert_eq!(view.tenor(), 0);
                    assert_eq!(view.rung_count(), 1);
                    let rung = view.rungs().next().unwrap();
                    assert!(rung.bid < rung.ask);
                    assert_eq!(rung.volume, RUNG_VOLUME);
                }
                other => panic!("expected quote, got {other:?}"),
            }
        }
    }

    #[test]
    fn no_sweep_before_the_interval_elapses() {
        let bus = IpcBus::connect("gen-test");
        let mut generator = generator_on(&bus, 1);
        assert_eq!(generator.do_work(), 17);
        assert_eq!(generator.do_work(), 0);
    }

    #[test]
    fn next_sweep_after_the_interval_elapses() {
        let bus = IpcBus::connect("gen-test");
        let mut generator = generator_on(&bus, 1_000);
        assert_eq!(generator.do_work(), 17);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(generator.do_work(), 17);
    }

    #[test]
    fn added_symbol_joins_the_sweep() {
        let bus = IpcBus::connect("gen-test");
        let mut generator = generator_on(&bus, 10);
        generator.add_symbol(Symbol::new("USDNOK").unwrap(), 10.50);
        assert_eq!(generator.symbol_count(), 18);
        assert_eq!(generator.do_work(), 18);
    }

    #[test]
    fn update_model_overrides_a_live_pair() {
        let bus = IpcBus::connect("gen-test");
        let mut generator = generator_on(&bus, 10);
        let eurusd = Symbol::new("EURUSD").unwrap();
        assert!(generator.update_model(eurusd, 0.10, 2.0));
        assert!(!generator.update_model(Symbol::new("ZZZYYY").unwrap(), 0.1, 1.0));
    }
}
