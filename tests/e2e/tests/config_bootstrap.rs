//! Config bootstrap scenario: seed, record, replay, rebuild

use config_service::ConfigService;
use fxgrid_e2e_tests::{run_until_quiet, test_bus, CHANNEL};
use refdata::{BootstrapState, ConfigAgent, CurrencySnapshots, TierSnapshots};
use types::StreamId;

fn agent_with_replay(
    bus: &transport::IpcBus,
    service: &ConfigService,
    tier_snapshots: TierSnapshots,
) -> ConfigAgent {
    ConfigAgent::new(
        Some(bus.replay(service.recording(), 0).unwrap()),
        bus.subscribe(CHANNEL, StreamId::Config.code()),
        CurrencySnapshots::new(),
        tier_snapshots,
    )
    .unwrap()
}

#[test]
fn agent_bootstraps_from_recorded_catalog() {
    let bus = test_bus("e2e-bootstrap");
    let mut service = ConfigService::new(&bus, CHANNEL);
    service.seed_defaults().unwrap();

    let mut agent = agent_with_replay(&bus, &service, TierSnapshots::new());
    assert!(!agent.store().is_bootstrapped());
    run_until_quiet(&mut agent);

    assert!(agent.store().is_bootstrapped());
    let usd = agent.store().currency(1).unwrap();
    assert_eq!(usd.symbol, "USD");
    assert_eq!(usd.spot_precision, 2);
    assert_eq!(usd.forward_precision, 4);
    assert_eq!(usd.amount_precision, 0);
    assert_eq!(agent.store().tier(3).unwrap().tier_name, "GOLD");
}

#[test]
fn bootstrap_happens_exactly_once() {
    let bus = test_bus("e2e-bootstrap");
    let mut service = ConfigService::new(&bus, CHANNEL);
    service.seed_defaults().unwrap();
    // a second sentinel must not move the recorded bootstrap time
    service.send_load_complete().unwrap();

    let mut agent = agent_with_replay(&bus, &service, TierSnapshots::new());
    run_until_quiet(&mut agent);

    let first = match agent.store().state() {
        BootstrapState::Bootstrapped { at } => at,
        other => panic!("expected bootstrapped, got {other:?}"),
    };
    run_until_quiet(&mut agent);
    assert_eq!(
        agent.store().state(),
        BootstrapState::Bootstrapped { at: first }
    );
}

#[test]
fn restarted_agent_rebuilds_caches_from_replay() {
    let bus = test_bus("e2e-bootstrap");
    let mut service = ConfigService::new(&bus, CHANNEL);
    service.seed_defaults().unwrap();

    {
        let mut first = agent_with_replay(&bus, &service, TierSnapshots::new());
        run_until_quiet(&mut first);
        assert!(first.store().is_bootstrapped());
    }

    // simulated restart: a fresh agent sees only the durable log
    let snapshots = TierSnapshots::new();
    let mut second = agent_with_replay(&bus, &service, snapshots.clone());
    run_until_quiet(&mut second);
    assert!(second.store().is_bootstrapped());
    assert_eq!(second.store().currency(8).unwrap().symbol, "CAD");
    assert_eq!(snapshots.get(4).unwrap().tier_name, "PLATINUM");
}

#[test]
fn live_updates_follow_the_replayed_log() {
    let bus = test_bus("e2e-bootstrap");
    let mut service = ConfigService::new(&bus, CHANNEL);
    service.seed_defaults().unwrap();

    let mut agent = agent_with_replay(&bus, &service, TierSnapshots::new());
    run_until_quiet(&mut agent);

    let mut update = refdata::tier::bootstrap_msg(types::ClientTierLevel::Gold);
    update.markup_bps = 0.75;
    service.send_tier(&update).unwrap();
    run_until_quiet(&mut agent);

    assert_eq!(agent.store().tier(3).unwrap().markup_bps, 0.75);
}
