//! Fixed-layout payload structs for the five message kinds
//!
//! Field ordering is chosen so every struct has zero implicit padding:
//! 8-byte fields first, then u32, u16, u8, then explicit padding bytes.
//! All integers are little-endian on the wire; prices are IEEE754 f64.

use crate::symbol::{Symbol, SYMBOL_CAP};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Depth ladder cap for a single Quote; exceeding it is a construction error
pub const MAX_RUNGS: usize = 10;

/// Fixed wire field for tier names
pub const TIER_NAME_CAP: usize = 32;

/// One price/volume level within a Quote's depth ladder (24 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, AsBytes, FromBytes, FromZeroes)]
pub struct Rung {
    pub bid: f64,
    pub ask: f64,
    pub volume: u64,
}

impl Rung {
    /// Rung size in bytes
    pub const SIZE: usize = 24;

    pub fn new(bid: f64, ask: f64, volume: u64) -> Self {
        Self { bid, ask, volume }
    }

    /// Midpoint of this rung
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }
}

/// Quote fixed block (32 bytes); up to [`MAX_RUNGS`] rungs follow on the wire
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, AsBytes, FromBytes, FromZeroes)]
pub struct QuoteMsg {
    /// Currency pair, NUL-padded ASCII
    pub symbol: [u8; SYMBOL_CAP],
    /// Settlement date as days since the Unix epoch
    pub value_date: i64,
    /// Price creation time, nanoseconds since the Unix epoch
    pub price_creation_ts: u64,
    /// Tenor code (days; 0 = spot)
    pub tenor: u16,
    /// Client tier code the quote references (resolved via the config cache)
    pub client_tier: u16,
    /// Number of rungs following the fixed block
    pub rung_count: u8,
    pub _padding: [u8; 3],
}

impl QuoteMsg {
    /// Fixed block size in bytes
    pub const BLOCK_LENGTH: usize = 32;

    /// Symbol accessor
    pub fn symbol(&self) -> Symbol {
        Symbol::from_raw(self.symbol)
    }
}

/// Heartbeat payload (16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
pub struct HeartbeatMsg {
    /// Emission time, milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Owning process role (see [`crate::AppId`])
    pub app_id: u32,
    pub _padding: [u8; 4],
}

impl HeartbeatMsg {
    pub const BLOCK_LENGTH: usize = 16;
}

/// Currency configuration payload (16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
pub struct CurrencyConfigMsg {
    /// Stable currency key
    pub id: u32,
    pub spot_precision: u8,
    pub forward_precision: u8,
    pub amount_precision: u8,
    /// Meaningful bytes in `symbol`
    pub symbol_len: u8,
    /// ISO-style currency code, NUL-padded ASCII
    pub symbol: [u8; SYMBOL_CAP],
}

impl CurrencyConfigMsg {
    pub const BLOCK_LENGTH: usize = 16;

    /// Currency code accessor
    pub fn symbol_str(&self) -> &str {
        let end = (self.symbol_len as usize).min(SYMBOL_CAP);
        std::str::from_utf8(&self.symbol[..end]).unwrap_or("")
    }
}

/// Client tier commercial parameters payload (120 bytes)
///
/// Boolean capability flags travel as u8 (0 = false, 1 = true).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, AsBytes, FromBytes, FromZeroes)]
pub struct ClientTierConfigMsg {
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
    /// Immutable tier key
    pub tier_id: u16,
    pub price_precision: u8,
    pub streaming_enabled: u8,
    pub limit_order_enabled: u8,
    pub access_to_crosses: u8,
    pub tier_priority: u8,
    /// Meaningful bytes in `tier_name`
    pub tier_name_len: u8,
    /// Display name, NUL-padded ASCII
    pub tier_name: [u8; TIER_NAME_CAP],
    pub _padding: [u8; 4],
}

impl ClientTierConfigMsg {
    pub const BLOCK_LENGTH: usize = 120;

    /// Tier name accessor
    pub fn tier_name_str(&self) -> &str {
        let end = (self.tier_name_len as usize).min(TIER_NAME_CAP);
        std::str::from_utf8(&self.tier_name[..end]).unwrap_or("")
    }
}

/// Sentinel marking end of historical config replay (8 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
pub struct ConfigLoadCompleteMsg {
    /// Sentinel emission time, milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl ConfigLoadCompleteMsg {
    pub const BLOCK_LENGTH: usize = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sizes_match_block_lengths() {
        assert_eq!(std::mem::size_of::<Rung>(), Rung::SIZE);
        assert_eq!(std::mem::size_of::<QuoteMsg>(), QuoteMsg::BLOCK_LENGTH);
        assert_eq!(
            std::mem::size_of::<HeartbeatMsg>(),
            HeartbeatMsg::BLOCK_LENGTH
        );
        assert_eq!(
            std::mem::size_of::<CurrencyConfigMsg>(),
            CurrencyConfigMsg::BLOCK_LENGTH
        );
        assert_eq!(
            std::mem::size_of::<ClientTierConfigMsg>(),
            ClientTierConfigMsg::BLOCK_LENGTH
        );
        assert_eq!(
            std::mem::size_of::<ConfigLoadCompleteMsg>(),
            ConfigLoadCompleteMsg::BLOCK_LENGTH
        );
    }

    #[test]
    fn rung_mid_is_arithmetic_mean() {
        let rung = Rung::new(1.1000, 1.1002, 1_000_000);
        assert!((rung.mid() - 1.1001).abs() < 1e-12);
    }

    #[test]
    fn currency_symbol_respects_length_prefix() {
        let mut msg = CurrencyConfigMsg::new_zeroed();
        msg.symbol[..3].copy_from_slice(b"USD");
        msg.symbol_len = 3;
        assert_eq!(msg.symbol_str(), "USD");
    }

    #[test]
    fn tier_name_respects_length_prefix() {
        let mut msg = ClientTierConfigMsg::new_zeroed();
        msg.tier_name[..4].copy_from_slice(b"GOLD");
        msg.tier_name_len = 4;
        assert_eq!(msg.tier_name_str(), "GOLD");
    }
}
