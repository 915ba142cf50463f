//! Closed identifier sets for the wire catalog
//!
//! Every enum here is a small closed set dispatched by integer code on the
//! wire. `num_enum` gives O(1) fallible conversion from the primitive; the
//! client tier set additionally supports array-backed iteration so per-tier
//! fan-out never touches a hash map.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Payload dispatch tag carried in `MessageHeader::template_id`
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum TemplateId {
    Quote = 1,
    Heartbeat = 2,
    CurrencyConfig = 3,
    ClientTierConfig = 4,
    ConfigLoadComplete = 5,
}

/// Stream identifiers - the stable interop contract
///
/// Tiered market quotes are published on `MarketQuote as i32 + tier_id`, so
/// the enum value is the base of a small contiguous range rather than a
/// single stream.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum StreamId {
    RawQuote = 100,
    MarketQuote = 200,
    ClientQuote = 300,
    Heartbeat = 800,
    Config = 900,
}

impl StreamId {
    /// Numeric stream code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Tier-specific market quote stream
    pub fn market_quote_for(tier: ClientTierLevel) -> i32 {
        StreamId::MarketQuote as i32 + tier.id() as i32
    }
}

/// Process role identifiers carried in Heartbeat frames
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum AppId {
    MediaDriver = 0,
    ConfigService = 1,
    QuotingEngine = 2,
    PricingEngine = 3,
    MarketData = 4,
    StandardAdapter = 5,
}

/// Client tier catalog (bootstrap defaults)
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum ClientTierLevel {
    Bronze = 1,
    Silver = 2,
    Gold = 3,
    Platinum = 4,
}

impl ClientTierLevel {
    /// All tiers in id order, for array-backed fan-out
    pub const ALL: [ClientTierLevel; 4] = [
        ClientTierLevel::Bronze,
        ClientTierLevel::Silver,
        ClientTierLevel::Gold,
        ClientTierLevel::Platinum,
    ];

    /// Numeric tier id
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Zero-based index into a per-tier array
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// Display name matching the bootstrap catalog
    pub fn name(self) -> &'static str {
        match self {
            ClientTierLevel::Bronze => "BRONZE",
            ClientTierLevel::Silver => "SILVER",
            ClientTierLevel::Gold => "GOLD",
            ClientTierLevel::Platinum => "PLATINUM",
        }
    }
}

/// Tenor codes (value in days, SPOT/TOM/TODAY as special cases)
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
pub enum Tenor {
    Spot = 0,
    Tom = 1,
    Today = 2,
    OneWeek = 7,
    TwoWeeks = 14,
    OneMonth = 30,
    ThreeMonths = 90,
    SixMonths = 180,
    OneYear = 365,
}
