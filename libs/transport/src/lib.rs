//! # Fxgrid Transport - Channel Abstraction
//!
//! ## Purpose
//!
//! The seam between the message pipeline and whatever carries frames between
//! processes. The pipeline only sees three capabilities: publish
//! (`offer` with a backpressure result), subscribe-with-poll (bounded
//! fragment limit, frames delivered in arrival order per channel), and a
//! durable log that supports recording and replay-from-position.
//!
//! An in-process implementation ([`IpcBus`]) backs the services and the
//! end-to-end tests: per-(channel, stream) topics with a bounded in-flight
//! window (slowest attached subscriber drives backpressure) and retained
//! frames for replay. The bus is an explicitly constructed, explicitly owned
//! value handed to workers at startup - there is no process-wide singleton.
//!
//! ## What This Crate Does NOT Contain
//! - Frame encoding/decoding (libs/codec)
//! - Worker scheduling (libs/runtime)

pub mod bus;
pub mod error;

pub use bus::{IpcBus, RecordingId, RecordingInfo, MAX_FRAME_LENGTH};
pub use error::TransportError;

/// Publishing side of one (channel, stream) pair
///
/// `offer` is non-blocking: a full window reports
/// [`TransportError::Backpressured`] and the caller decides how to retry
/// (see the runtime publisher's bounded retry policy).
pub trait Publication: Send {
    /// Offer one frame; returns the stream position on success
    fn offer(&self, frame: &[u8]) -> Result<u64, TransportError>;

    /// Channel this publication writes to
    fn channel(&self) -> &str;

    /// Stream id this publication writes to
    fn stream_id(&self) -> i32;
}

/// Subscribing side of one (channel, stream) pair
///
/// Frames are delivered to the handler in arrival order for this channel;
/// there is no cross-channel ordering guarantee.
pub trait Subscription: Send {
    /// Poll up to `fragment_limit` frames into `handler`; returns the count
    fn poll(&mut self, handler: &mut dyn FnMut(&[u8]), fragment_limit: usize) -> usize;

    /// False once the underlying stream is closed or a replay is exhausted
    fn is_connected(&self) -> bool;

    /// Release the subscriber's cursor
    fn close(&mut self);
}
