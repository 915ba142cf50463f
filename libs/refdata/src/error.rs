//! Reference data validation failures
//!
//! A failed validation rejects one update and preserves the prior cached
//! value. It is logged by the hosting worker and never propagates out of
//! the polling cycle.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("currency {id}: empty symbol")]
    EmptySymbol { id: u32 },

    #[error("tier {tier_id}: empty tier name")]
    EmptyTierName { tier_id: u16 },

    #[error("tier {tier_id}: {field} must be >= 0, got {value}")]
    NegativeField {
        tier_id: u16,
        field: &'static str,
        value: f64,
    },

    #[error("tier {tier_id}: max notional {max} below min notional {min}")]
    NotionalRange { tier_id: u16, min: f64, max: f64 },
}
