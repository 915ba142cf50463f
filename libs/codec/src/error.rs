//! Codec errors with diagnostic context
//!
//! Decode errors are skip-and-continue conditions for pollers; encode errors
//! indicate a caller bug (undersized buffer, oversized ladder) and surface
//! before any bytes are written.

use thiserror::Error;
use types::SymbolError;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Encode/decode failures for fxgrid frames
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Caller buffer cannot hold the frame being encoded
    #[error("buffer too small: need {need} bytes at offset {offset}, got {got} ({context})")]
    BufferTooSmall {
        need: usize,
        got: usize,
        offset: usize,
        context: &'static str,
    },

    /// Frame shorter than its header-declared extent
    #[error("truncated frame: template {template_id} needs {need} bytes, got {got}")]
    TruncatedFrame {
        template_id: u16,
        need: usize,
        got: usize,
    },

    /// Header template id not recognised by this schema version
    #[error("unknown template id {template_id}: known templates are 1-5")]
    UnknownTemplate { template_id: u16 },

    /// Header schema id does not belong to this protocol family
    #[error("schema mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u16, got: u16 },

    /// Quote ladder exceeds the wire cap; construction error, never truncation
    #[error("too many rungs: {count} exceeds cap {cap}")]
    TooManyRungs { count: usize, cap: usize },

    /// Invalid symbol text on the encode path
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl CodecError {
    /// True for frame-level decode errors a poller should skip past
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            CodecError::UnknownTemplate { .. }
                | CodecError::TruncatedFrame { .. }
                | CodecError::SchemaMismatch { .. }
        )
    }
}
