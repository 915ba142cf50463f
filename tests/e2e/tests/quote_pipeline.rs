//! Full pipeline scenario: config seed, generator sweep, tier fan-out

use codec::{decode_frame, Frame};
use config_service::ConfigService;
use fxgrid_e2e_tests::{drain, run_until_quiet, test_bus, CHANNEL};
use market_data::generator::FxPriceGenerator;
use pricing_engine::pipe::QuotePricerPipe;
use pricing_engine::pricer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use refdata::{ConfigAgent, CurrencySnapshots, TierSnapshots};
use runtime::{BusySpinIdleStrategy, RetryingPublisher, Worker};
use transport::IpcBus;
use types::{ClientTierLevel, Rung, StreamId};

const SEEDED_PAIRS: usize = 17;

struct Pipeline {
    generator: FxPriceGenerator,
    agent: ConfigAgent,
    pipe: QuotePricerPipe,
    snapshots: TierSnapshots,
}

fn build_pipeline(bus: &IpcBus) -> Pipeline {
    let mut service = ConfigService::new(bus, CHANNEL);
    service.seed_defaults().unwrap();

    let snapshots = TierSnapshots::new();
    let agent = ConfigAgent::new(
        Some(bus.replay(service.recording(), 0).unwrap()),
        bus.subscribe(CHANNEL, StreamId::Config.code()),
        CurrencySnapshots::new(),
        snapshots.clone(),
    )
    .unwrap();

    let generator = FxPriceGenerator::with_rng(
        RetryingPublisher::new(
            bus.publish(CHANNEL, StreamId::RawQuote.code()),
            Box::new(BusySpinIdleStrategy),
        ),
        100,
        StdRng::seed_from_u64(42),
    );

    let publishers = ClientTierLevel::ALL.map(|level| {
        RetryingPublisher::new(
            bus.publish(CHANNEL, StreamId::market_quote_for(level)),
            Box::new(BusySpinIdleStrategy),
        )
    });
    let pipe = QuotePricerPipe::new(
        bus.subscribe(CHANNEL, StreamId::RawQuote.code()),
        snapshots.clone(),
        publishers,
    );

    Pipeline {
        generator,
        agent,
        pipe,
        snapshots,
    }
}

#[test]
fn raw_quotes_fan_out_to_every_tier_stream() {
    let bus = test_bus("e2e-pipeline");
    let mut tier_subs: Vec<_> = ClientTierLevel::ALL
        .iter()
        .map(|level| bus.subscribe(CHANNEL, StreamId::market_quote_for(*level)))
        .collect();
    let mut pipeline = build_pipeline(&bus);

    run_until_quiet(&mut pipeline.agent);
    assert!(pipeline.agent.store().is_bootstrapped());

    assert_eq!(pipeline.generator.do_work(), SEEDED_PAIRS);
    run_until_quiet(&mut pipeline.pipe);

    for (index, sub) in tier_subs.iter_mut().enumerate() {
        let tier_id = (index + 1) as u16;
        let frames = drain(sub);
        assert_eq!(
            frames.len(),
            SEEDED_PAIRS,
            "tier {tier_id} should see one quote per pair"
        );
        for frame in &frames {
            match decode_frame(frame).unwrap() {
                Frame::Quote(view) => {
                    assert_eq!(view.client_tier(), tier_id);
                    assert_eq!(view.rung_count(), 1);
                }
                other => panic!("expected quote, got {other:?}"),
            }
        }
    }
}

#[test]
fn tiered_output_matches_the_transform_applied_to_raw_input() {
    let bus = test_bus("e2e-pipeline");
    let mut raw_sub = bus.subscribe(CHANNEL, StreamId::RawQuote.code());
    let mut gold_sub = bus.subscribe(CHANNEL, StreamId::market_quote_for(ClientTierLevel::Gold));
    let mut pipeline = build_pipeline(&bus);

    run_until_quiet(&mut pipeline.agent);
    pipeline.generator.do_work();
    run_until_quiet(&mut pipeline.pipe);

    let raw_frames = drain(&mut raw_sub);
    let gold_frames = drain(&mut gold_sub);
    assert_eq!(raw_frames.len(), gold_frames.len());

    let gold = pipeline.snapshots.get(ClientTierLevel::Gold.id()).unwrap();
    for (raw, tiered) in raw_frames.iter().zip(&gold_frames) {
        let (raw_symbol, raw_rung) = match decode_frame(raw).unwrap() {
            Frame::Quote(view) => (view.symbol(), view.rungs().next().unwrap()),
            other => panic!("expected raw quote, got {other:?}"),
        };
        match decode_frame(tiered).unwrap() {
            Frame::Quote(view) => {
                assert_eq!(view.symbol(), raw_symbol);
                let rung: Rung = view.rungs().next().unwrap();
                let expected = pricer::calculate(&gold, &raw_rung);
                assert!((rung.bid - expected.bid).abs() < 1e-12);
                assert!((rung.ask - expected.ask).abs() < 1e-12);
            }
            other => panic!("expected tiered quote, got {other:?}"),
        }
    }
}

#[test]
fn quotes_generated_before_bootstrap_use_preseeded_defaults() {
    // the agent publishes bootstrap defaults at construction, so the pipe
    // can price even before the recorded catalog replays
    let bus = test_bus("e2e-pipeline");
    let mut gold_sub = bus.subscribe(CHANNEL, StreamId::market_quote_for(ClientTierLevel::Gold));
    let mut pipeline = build_pipeline(&bus);

    assert!(!pipeline.agent.store().is_bootstrapped());
    pipeline.generator.do_work();
    run_until_quiet(&mut pipeline.pipe);
    assert_eq!(drain(&mut gold_sub).len(), SEEDED_PAIRS);
}
