//! Message Header Implementation
//!
//! The header is identical for all messages and carries the dispatch tag and
//! schema metadata. The template id selects the decoder; the version allows
//! additive evolution without breaking older readers.

use crate::identifiers::TemplateId;
use crate::{SCHEMA_ID, SCHEMA_VERSION};
use zerocopy::{AsBytes, FromBytes, FromZeroes};

/// Message Header (8 bytes)
///
/// Precedes every frame on every stream. All fields are little-endian u16,
/// so the struct has natural 2-byte alignment and zero padding.
///
/// ```text
/// ┌────────────────┬─────────────────────────────────────┐
/// │ MessageHeader  │ Payload (block + optional group)    │
/// │ (8 bytes)      │ (block_length + variable)           │
/// └────────────────┴─────────────────────────────────────┘
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsBytes, FromBytes, FromZeroes)]
pub struct MessageHeader {
    /// Length of the fixed payload block that follows the header
    pub block_length: u16,
    /// Dispatch tag selecting the payload decoder
    pub template_id: u16,
    /// Schema family identifier
    pub schema_id: u16,
    /// Schema version for additive evolution
    pub version: u16,
}

impl MessageHeader {
    /// Header size in bytes
    pub const SIZE: usize = 8;

    /// Create a header for the given template and fixed block length
    pub fn new(template: TemplateId, block_length: u16) -> Self {
        Self {
            block_length,
            template_id: template as u16,
            schema_id: SCHEMA_ID,
            version: SCHEMA_VERSION,
        }
    }

    /// Resolve the dispatch tag, if recognised by this schema version
    pub fn template(&self) -> Option<TemplateId> {
        TemplateId::try_from(self.template_id).ok()
    }
}
