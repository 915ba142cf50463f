//! Bounded ASCII symbol type
//!
//! Currency pair symbols travel on the wire as a fixed 8-byte field,
//! NUL-padded on the right. Construction rejects oversized or non-ASCII
//! input instead of truncating.

use thiserror::Error;
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Maximum symbol length in bytes
pub const SYMBOL_CAP: usize = 8;

/// Symbol construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// Input exceeds the fixed wire field
    #[error("symbol too long: {got} bytes exceeds cap {cap} ({text:?})")]
    TooLong { got: usize, cap: usize, text: String },

    /// Input contains bytes outside printable ASCII
    #[error("symbol contains non-ASCII byte {byte:#04x} at index {index}")]
    NonAscii { byte: u8, index: usize },
}

/// Fixed-width ASCII symbol (≤ 8 chars, NUL-padded)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsBytes, FromBytes, FromZeroes)]
pub struct Symbol([u8; SYMBOL_CAP]);

impl Symbol {
    /// Build a symbol from ASCII text, rejecting oversized or non-ASCII input
    pub fn new(text: &str) -> Result<Self, SymbolError> {
        if text.len() > SYMBOL_CAP {
            return Err(SymbolError::TooLong {
                got: text.len(),
                cap: SYMBOL_CAP,
                text: text.to_string(),
            });
        }
        if let Some((index, &byte)) = text
            .as_bytes()
            .iter()
            .enumerate()
            .find(|(_, b)| !b.is_ascii_graphic())
        {
            return Err(SymbolError::NonAscii { byte, index });
        }
        let mut raw = [0u8; SYMBOL_CAP];
        raw[..text.len()].copy_from_slice(text.as_bytes());
        Ok(Self(raw))
    }

    /// Wrap raw wire bytes without validation (decoder path)
    pub fn from_raw(raw: [u8; SYMBOL_CAP]) -> Self {
        Self(raw)
    }

    /// Raw wire bytes including NUL padding
    pub fn raw(&self) -> [u8; SYMBOL_CAP] {
        self.0
    }

    /// Symbol text without padding
    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(SYMBOL_CAP);
        // Construction only admits ASCII; decoded frames may carry arbitrary
        // bytes, so fall back to the empty string rather than panic.
        std::str::from_utf8(&self.0[..end]).unwrap_or("")
    }

    /// Number of meaningful bytes
    pub fn len(&self) -> usize {
        self.0.iter().position(|&b| b == 0).unwrap_or(SYMBOL_CAP)
    }

    /// True when the symbol holds no text
    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Base currency of a 6-char pair symbol (first three chars)
    pub fn base_ccy(&self) -> &str {
        let text = self.as_str();
        if text.len() >= 6 {
            &text[..3]
        } else {
            text
        }
    }

    /// Quote currency of a 6-char pair symbol (last three chars)
    pub fn quote_ccy(&self) -> &str {
        let text = self.as_str();
        if text.len() >= 6 {
            &text[3..6]
        } else {
            ""
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}
