//! Transport error taxonomy
//!
//! Transient conditions (backpressure) are retried by callers under a
//! bounded policy; terminal conditions end the owning worker's polling loop
//! via its close hook.

use thiserror::Error;

/// Channel-level failures reported by `offer` and the archive API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Transient: the in-flight window is full; retry under a bounded policy
    #[error("backpressured: stream {stream_id} window full ({in_flight}/{capacity} frames)")]
    Backpressured {
        stream_id: i32,
        in_flight: usize,
        capacity: usize,
    },

    /// Terminal: the channel is closed; stop polling/offering
    #[error("channel closed: {channel} stream {stream_id}")]
    Closed { channel: String, stream_id: i32 },

    /// Terminal: frame exceeds the transport maximum
    #[error("message too large: {size} bytes exceeds max {max}")]
    MessageTooLarge { size: usize, max: usize },

    /// Archive has no recording under this id
    #[error("unknown recording id {0}")]
    UnknownRecording(u64),
}

impl TransportError {
    /// True for conditions worth retrying (backpressure only)
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Backpressured { .. })
    }
}
