//! Currency metadata entity

use crate::error::ValidationError;
use types::CurrencyConfigMsg;

/// Cached currency metadata, reused in place across updates
///
/// Precisions are non-negative by construction (unsigned on the wire); the
/// only rejectable condition is an empty symbol.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CurrencyConfig {
    pub id: u32,
    pub symbol: String,
    pub spot_precision: u8,
    pub forward_precision: u8,
    pub amount_precision: u8,
}

impl CurrencyConfig {
    /// Validate `msg` and overwrite this entry; a rejection leaves the
    /// entry untouched
    pub fn apply(&mut self, msg: &CurrencyConfigMsg) -> Result<(), ValidationError> {
        let symbol = msg.symbol_str();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol { id: msg.id });
        }
        self.id = msg.id;
        self.symbol.clear();
        self.symbol.push_str(symbol);
        self.spot_precision = msg.spot_precision;
        self.forward_precision = msg.forward_precision;
        self.amount_precision = msg.amount_precision;
        Ok(())
    }

    /// Wire representation of this entry
    pub fn to_msg(&self) -> CurrencyConfigMsg {
        let mut msg = CurrencyConfigMsg {
            id: self.id,
            spot_precision: self.spot_precision,
            forward_precision: self.forward_precision,
            amount_precision: self.amount_precision,
            symbol_len: 0,
            symbol: [0; types::SYMBOL_CAP],
        };
        let len = self.symbol.len().min(types::SYMBOL_CAP);
        msg.symbol[..len].copy_from_slice(&self.symbol.as_bytes()[..len]);
        msg.symbol_len = len as u8;
        msg
    }
}
