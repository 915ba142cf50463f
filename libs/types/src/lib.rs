//! # Fxgrid Types - Wire Structs and Identifiers
//!
//! ## Purpose
//!
//! Pure data definitions for the fxgrid binary protocol: the fixed 8-byte
//! message header, the five payload layouts (Quote, Heartbeat,
//! CurrencyConfig, ClientTierConfig, ConfigLoadComplete), the bounded ASCII
//! `Symbol` type, and the closed identifier enums that make up the stable
//! wire catalog (stream ids, app ids, client tiers, tenors).
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec → libs/transport
//!     ↑             ↓             ↓
//! Pure Data    Encode/Decode   Channels
//! Structures   Rules           Pub/Sub + Replay
//! ```
//!
//! ## What This Crate Contains
//! - `MessageHeader` and the `TemplateId` dispatch tag
//! - Fixed-layout payload structs with zerocopy traits
//! - `Symbol` (bounded ASCII, 8 bytes) and `Rung` (one ladder level)
//! - `StreamId`, `AppId`, `ClientTierLevel`, `Tenor`
//!
//! ## What This Crate Does NOT Contain
//! - Encoding/decoding logic (belongs in libs/codec)
//! - Transport or channel management (belongs in libs/transport)
//! - Mutable cached entities (belongs in libs/refdata)

pub mod header;
pub mod identifiers;
pub mod messages;
pub mod symbol;

pub use header::MessageHeader;
pub use identifiers::{AppId, ClientTierLevel, StreamId, TemplateId, Tenor};
pub use messages::{
    ClientTierConfigMsg, ConfigLoadCompleteMsg, CurrencyConfigMsg, HeartbeatMsg, QuoteMsg, Rung,
    MAX_RUNGS, TIER_NAME_CAP,
};
pub use symbol::{Symbol, SymbolError, SYMBOL_CAP};

/// Protocol schema identifier carried in every header
pub const SCHEMA_ID: u16 = 1;

/// Protocol schema version carried in every header
pub const SCHEMA_VERSION: u16 = 1;
