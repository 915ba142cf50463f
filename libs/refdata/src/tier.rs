//! Client tier commercial parameters entity and bootstrap catalog

use crate::error::ValidationError;
use types::{ClientTierConfigMsg, ClientTierLevel, TIER_NAME_CAP};
use zerocopy::FromZeroes;

/// Cached tier parameters, reused in place across updates
///
/// `tier_skew`, `client_tier_skew` and `signal` are unconstrained signed
/// multipliers; every other numeric field must be non-negative and
/// `max_notional` must not fall below `min_notional`. Validation runs in
/// full before any field is assigned, so a rejected update leaves the
/// entry exactly as it was.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClientTierConfig {
    pub tier_id: u16,
    pub tier_name: String,
    pub markup_bps: f64,
    pub spread_tightening_factor: f64,
    pub min_notional: f64,
    pub max_notional: f64,
    pub credit_limit_usd: f64,
    pub tier_skew: f64,
    pub client_tier_skew: f64,
    pub signal: f64,
    pub quote_throttle_ms: u32,
    pub latency_protection_ms: u32,
    pub quote_expiry_ms: u32,
    pub price_precision: u8,
    pub tier_priority: u8,
    pub streaming_enabled: bool,
    pub limit_order_enabled: bool,
    pub access_to_crosses: bool,
}

fn non_negative(tier_id: u16, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value < 0.0 {
        return Err(ValidationError::NegativeField {
            tier_id,
            field,
            value,
        });
    }
    Ok(())
}

fn validate(msg: &ClientTierConfigMsg) -> Result<(), ValidationError> {
    if msg.tier_name_str().is_empty() {
        return Err(ValidationError::EmptyTierName {
            tier_id: msg.tier_id,
        });
    }
    non_negative(msg.tier_id, "markup_bps", msg.markup_bps)?;
    non_negative(
        msg.tier_id,
        "spread_tightening_factor",
        msg.spread_tightening_factor,
    )?;
    non_negative(msg.tier_id, "min_notional", msg.min_notional)?;
    non_negative(msg.tier_id, "credit_limit_usd", msg.credit_limit_usd)?;
    if msg.max_notional < msg.min_notional {
        return Err(ValidationError::NotionalRange {
            tier_id: msg.tier_id,
            min: msg.min_notional,
            max: msg.max_notional,
        });
    }
    Ok(())
}

impl ClientTierConfig {
    /// Validate `msg` and overwrite this entry; a rejection leaves the
    /// entry untouched
    pub fn apply(&mut self, msg: &ClientTierConfigMsg) -> Result<(), ValidationError> {
        validate(msg)?;
        self.tier_id = msg.tier_id;
        self.tier_name.clear();
        self.tier_name.push_str(msg.tier_name_str());
        self.markup_bps = msg.markup_bps;
        self.spread_tightening_factor = msg.spread_tightening_factor;
        self.min_notional = msg.min_notional;
        self.max_notional = msg.max_notional;
        self.credit_limit_usd = msg.credit_limit_usd;
        self.tier_skew = msg.tier_skew;
        self.client_tier_skew = msg.client_tier_skew;
        self.signal = msg.signal;
        self.quote_throttle_ms = msg.quote_throttle_ms;
        self.latency_protection_ms = msg.latency_protection_ms;
        self.quote_expiry_ms = msg.quote_expiry_ms;
        self.price_precision = msg.price_precision;
        self.tier_priority = msg.tier_priority;
        self.streaming_enabled = msg.streaming_enabled != 0;
        self.limit_order_enabled = msg.limit_order_enabled != 0;
        self.access_to_crosses = msg.access_to_crosses != 0;
        Ok(())
    }

    /// Wire representation of this entry
    pub fn to_msg(&self) -> ClientTierConfigMsg {
        let mut msg = ClientTierConfigMsg::new_zeroed();
        msg.tier_id = self.tier_id;
        msg.markup_bps = self.markup_bps;
        msg.spread_tightening_factor = self.spread_tightening_factor;
        msg.min_notional = self.min_notional;
        msg.max_notional = self.max_notional;
        msg.credit_limit_usd = self.credit_limit_usd;
        msg.tier_skew = self.tier_skew;
        msg.client_tier_skew = self.client_tier_skew;
        msg.signal = self.signal;
        msg.quote_throttle_ms = self.quote_throttle_ms;
        msg.latency_protection_ms = self.latency_protection_ms;
        msg.quote_expiry_ms = self.quote_expiry_ms;
        msg.price_precision = self.price_precision;
        msg.tier_priority = self.tier_priority;
        msg.streaming_enabled = self.streaming_enabled as u8;
        msg.limit_order_enabled = self.limit_order_enabled as u8;
        msg.access_to_crosses = self.access_to_crosses as u8;
        let len = self.tier_name.len().min(TIER_NAME_CAP);
        msg.tier_name[..len].copy_from_slice(&self.tier_name.as_bytes()[..len]);
        msg.tier_name_len = len as u8;
        msg
    }
}

/// Default commercial parameters for one well-known tier
///
/// Used both to pre-seed caches before replay and as the catalog the config
/// service publishes at startup. Real replayed configuration silently
/// overwrites these.
pub fn bootstrap_msg(level: ClientTierLevel) -> ClientTierConfigMsg {
    let mut msg = ClientTierConfigMsg::new_zeroed();
    msg.tier_id = level.id();
    msg.tier_priority = level.id() as u8;
    msg.min_notional = 1_000.0;
    msg.price_precision = 5;
    msg.streaming_enabled = 1;
    let name = level.name();
    msg.tier_name[..name.len()].copy_from_slice(name.as_bytes());
    msg.tier_name_len = name.len() as u8;
    match level {
        ClientTierLevel::Bronze => {
            msg.markup_bps = 2.5;
            msg.spread_tightening_factor = 2.5;
            msg.max_notional = 10_000_000.0;
            msg.credit_limit_usd = 1_000_000.0;
            msg.tier_skew = 2.0;
            msg.client_tier_skew = 0.5;
            msg.signal = 2.0;
            msg.quote_throttle_ms = 500;
            msg.latency_protection_ms = 250;
            msg.quote_expiry_ms = 5_000;
        }
        ClientTierLevel::Silver => {
            msg.markup_bps = 2.0;
            msg.spread_tightening_factor = 2.0;
            msg.max_notional = 25_000_000.0;
            msg.credit_limit_usd = 5_000_000.0;
            msg.tier_skew = 1.75;
            msg.client_tier_skew = 0.4;
            msg.signal = 1.75;
            msg.quote_throttle_ms = 250;
            msg.latency_protection_ms = 100;
            msg.quote_expiry_ms = 3_000;
            msg.limit_order_enabled = 1;
        }
        ClientTierLevel::Gold => {
            msg.markup_bps = 1.5;
            msg.spread_tightening_factor = 1.5;
            msg.max_notional = 50_000_000.0;
            msg.credit_limit_usd = 10_000_000.0;
            msg.tier_skew = 1.5;
            msg.client_tier_skew = 0.25;
            msg.signal = 1.5;
            msg.quote_throttle_ms = 100;
            msg.latency_protection_ms = 50;
            msg.quote_expiry_ms = 2_000;
            msg.limit_order_enabled = 1;
            msg.access_to_crosses = 1;
        }
        ClientTierLevel::Platinum => {
            msg.markup_bps = 1.0;
            msg.spread_tightening_factor = 1.0;
            msg.max_notional = 100_000_000.0;
            msg.credit_limit_usd = 25_000_000.0;
            msg.tier_skew = 1.0;
            msg.client_tier_skew = 0.1;
            msg.signal = 1.0;
            msg.quote_throttle_ms = 50;
            msg.latency_protection_ms = 25;
            msg.quote_expiry_ms = 1_000;
            msg.limit_order_enabled = 1;
            msg.access_to_crosses = 1;
        }
    }
    msg
}
