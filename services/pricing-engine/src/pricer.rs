//! Tier pricing transform
//!
//! Adjusts a raw rung for one client tier's commercial parameters. All
//! adjustments scale with a volume factor so larger clips see wider
//! pricing; the tier's `signal` flips or amplifies the directional
//! component without constraint.

use refdata::ClientTierConfig;
use types::Rung;

const VOLUME_UNIT: f64 = 1_000_000.0;

/// Bid/ask produced for one (tier, rung) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierPrice {
    pub bid: f64,
    pub ask: f64,
}

/// Compute the tier-adjusted price for one rung
pub fn calculate(tier: &ClientTierConfig, rung: &Rung) -> TierPrice {
    let mid = rung.mid();
    let vol_factor = (rung.volume as f64 / VOLUME_UNIT + 1.0).log10();
    let spread_adjust = tier.spread_tightening_factor * (1.0 + 0.05 * vol_factor);
    let markup_adjust = tier.markup_bps * (1.0 + 0.1 * vol_factor);
    let skew_adjust = tier.tier_skew * vol_factor;
    let adjustment = tier.signal * (markup_adjust + skew_adjust);
    TierPrice {
        bid: mid - spread_adjust / 2.0 - adjustment,
        ask: mid + spread_adjust / 2.0 + adjustment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refdata::tier::bootstrap_msg;
    use types::ClientTierLevel;

    fn gold() -> ClientTierConfig {
        let mut tier = ClientTierConfig::default();
        tier.apply(&bootstrap_msg(ClientTierLevel::Gold)).unwrap();
        tier
    }

    #[test]
    fn gold_tier_reference_values() {
        // 1.5 markup, 1.5 tightening, 1.5 skew, 1.5 signal; 1M volume
        let rung = Rung::new(1.1000, 1.1002, 1_000_000);
        let tier = gold();

        let mid = rung.mid();
        let vol_factor = (rung.volume as f64 / VOLUME_UNIT + 1.0).log10();
        assert!((mid - 1.1001).abs() < 1e-12);
        assert!((vol_factor - 0.30103).abs() < 1e-5);

        let spread_adjust = tier.spread_tightening_factor * (1.0 + 0.05 * vol_factor);
        let markup_adjust = tier.markup_bps * (1.0 + 0.1 * vol_factor);
        let skew_adjust = tier.tier_skew * vol_factor;
        let adjustment = tier.signal * (markup_adjust + skew_adjust);
        assert!((spread_adjust - 1.522577).abs() < 1e-5);
        assert!((markup_adjust - 1.545155).abs() < 1e-5);
        assert!((skew_adjust - 0.451545).abs() < 1e-5);
        assert!((adjustment - 2.995049).abs() < 1e-5);

        let price = calculate(&tier, &rung);
        assert!((price.bid - (mid - spread_adjust / 2.0 - adjustment)).abs() < 1e-12);
        assert!((price.ask - (mid + spread_adjust / 2.0 + adjustment)).abs() < 1e-12);
    }

    #[test]
    fn output_is_symmetric_around_mid() {
        let rung = Rung::new(1.2500, 1.2502, 4_000_000);
        let price = calculate(&gold(), &rung);
        let mid = rung.mid();
        assert!(((mid - price.bid) - (price.ask - mid)).abs() < 1e-12);
    }

    #[test]
    fn negative_signal_inverts_the_adjustment() {
        let rung = Rung::new(1.1000, 1.1002, 1_000_000);
        let mut tier = gold();
        let positive = calculate(&tier, &rung);
        tier.signal = -tier.signal;
        let negative = calculate(&tier, &rung);
        assert!(negative.bid > positive.bid);
        assert!(negative.ask < positive.ask);
    }

    #[test]
    fn larger_volume_widens_the_price() {
        let small = Rung::new(1.1000, 1.1002, 1_000_000);
        let large = Rung::new(1.1000, 1.1002, 10_000_000);
        let tier = gold();
        let small_price = calculate(&tier, &small);
        let large_price = calculate(&tier, &large);
        assert!(large_price.ask - large_price.bid > small_price.ask - small_price.bid);
    }
}
