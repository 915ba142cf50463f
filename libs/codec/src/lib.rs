//! # Fxgrid Protocol Codec
//!
//! ## Purpose
//!
//! The "rules" layer of the fxgrid pipeline: fixed-layout encoding of the
//! five message kinds behind the common 8-byte header, and allocation-free
//! decoding that wraps the caller-supplied buffer region. Dispatch is by the
//! header template id; an unrecognised tag is reported to the caller, who
//! skips the frame and keeps polling.
//!
//! ## Hot Path Contract
//!
//! - **Encoding**: writers place header + payload directly into a caller
//!   buffer at an offset and return the encoded length. No heap allocation.
//! - **Decoding**: [`decode_frame`] returns a [`Frame`] tagged union; the
//!   `Quote` variant borrows the rung region and exposes a lazy iterator.
//!   Views are valid only while the backing buffer is not reused - callers
//!   needing durability must copy fields out inside the poll callback.
//!
//! ## What This Crate Does NOT Contain
//! - Transport or channel management (libs/transport)
//! - Cached mutable entities (libs/refdata)

pub mod error;
pub mod view;
pub mod writer;

pub use error::{CodecError, CodecResult};
pub use view::{decode_frame, parse_header, Frame, QuoteView, RungIter};
pub use writer::{
    encode_client_tier_config, encode_config_load_complete, encode_currency_config,
    encode_heartbeat, QuoteWriter,
};
