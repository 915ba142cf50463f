//! Allocation-free frame decoding
//!
//! [`decode_frame`] reads the header from the fixed offset, dispatches on the
//! template id, and returns a [`Frame`] tagged union. Fixed-size payloads are
//! copied to the stack (unaligned-safe reads, no heap); the quote variant
//! borrows the rung region so the ladder is walked lazily.
//!
//! Views are transient: they are only meaningful while the backing buffer
//! holds the polled frame. Anything needed past the poll callback must be
//! copied out.

use crate::error::{CodecError, CodecResult};
use types::{
    ClientTierConfigMsg, ConfigLoadCompleteMsg, CurrencyConfigMsg, HeartbeatMsg, MessageHeader,
    QuoteMsg, Rung, Symbol, TemplateId, SCHEMA_ID,
};
use zerocopy::FromBytes;

/// Parse and validate the 8-byte header at the start of `data`
pub fn parse_header(data: &[u8]) -> CodecResult<MessageHeader> {
    let header =
        MessageHeader::read_from_prefix(data).ok_or(CodecError::BufferTooSmall {
            need: MessageHeader::SIZE,
            got: data.len(),
            offset: 0,
            context: "header parse",
        })?;
    if header.schema_id != SCHEMA_ID {
        return Err(CodecError::SchemaMismatch {
            expected: SCHEMA_ID,
            got: header.schema_id,
        });
    }
    Ok(header)
}

/// One decoded frame, dispatched by header template id
///
/// A closed sum type rather than trait objects: the message set is small and
/// fixed, and pollers match on it without boxing.
#[derive(Debug)]
pub enum Frame<'a> {
    Quote(QuoteView<'a>),
    Heartbeat(HeartbeatMsg),
    CurrencyConfig(CurrencyConfigMsg),
    ClientTierConfig(ClientTierConfigMsg),
    ConfigLoadComplete(ConfigLoadCompleteMsg),
}

fn read_block<T: FromBytes>(
    data: &[u8],
    template_id: u16,
    block_length: usize,
) -> CodecResult<T> {
    let need = MessageHeader::SIZE + block_length;
    if data.len() < need {
        return Err(CodecError::TruncatedFrame {
            template_id,
            need,
            got: data.len(),
        });
    }
    T::read_from_prefix(&data[MessageHeader::SIZE..]).ok_or(CodecError::TruncatedFrame {
        template_id,
        need,
        got: data.len(),
    })
}

/// Decode one frame from `data` (header at offset 0)
///
/// Unknown template ids are reported, not fatal: the caller logs and skips
/// the frame while the poll loop continues.
pub fn decode_frame(data: &[u8]) -> CodecResult<Frame<'_>> {
    let header = parse_header(data)?;
    let template = header
        .template()
        .ok_or(CodecError::UnknownTemplate {
            template_id: header.template_id,
        })?;
    match template {
        TemplateId::Quote => Ok(Frame::Quote(QuoteView::wrap(data)?)),
        TemplateId::Heartbeat => Ok(Frame::Heartbeat(read_block(
            data,
            header.template_id,
            HeartbeatMsg::BLOCK_LENGTH,
        )?)),
        TemplateId::CurrencyConfig => Ok(Frame::CurrencyConfig(read_block(
            data,
            header.template_id,
            CurrencyConfigMsg::BLOCK_LENGTH,
        )?)),
        TemplateId::ClientTierConfig => Ok(Frame::ClientTierConfig(read_block(
            data,
            header.template_id,
            ClientTierConfigMsg::BLOCK_LENGTH,
        )?)),
        TemplateId::ConfigLoadComplete => Ok(Frame::ConfigLoadComplete(read_block(
            data,
            header.template_id,
            ConfigLoadCompleteMsg::BLOCK_LENGTH,
        )?)),
    }
}

/// Zero-allocation view over an encoded quote frame
///
/// The fixed block is read onto the stack; the rung region stays borrowed
/// from the frame and is iterated lazily.
#[derive(Debug)]
pub struct QuoteView<'a> {
    fixed: QuoteMsg,
    rung_bytes: &'a [u8],
}

impl<'a> QuoteView<'a> {
    /// Wrap an encoded quote frame (header at offset 0)
    pub fn wrap(data: &'a [u8]) -> CodecResult<Self> {
        let fixed: QuoteMsg = read_block(data, TemplateId::Quote as u16, QuoteMsg::BLOCK_LENGTH)?;
        let rung_start = MessageHeader::SIZE + QuoteMsg::BLOCK_LENGTH;
        let rung_len = fixed.rung_count as usize * Rung::SIZE;
        let need = rung_start + rung_len;
        if data.len() < need {
            return Err(CodecError::TruncatedFrame {
                template_id: TemplateId::Quote as u16,
                need,
                got: data.len(),
            });
        }
        Ok(Self {
            fixed,
            rung_bytes: &data[rung_start..need],
        })
    }

    pub fn symbol(&self) -> Symbol {
        self.fixed.symbol()
    }

    pub fn value_date(&self) -> i64 {
        self.fixed.value_date
    }

    pub fn tenor(&self) -> u16 {
        self.fixed.tenor
    }

    pub fn client_tier(&self) -> u16 {
        self.fixed.client_tier
    }

    pub fn price_creation_ts(&self) -> u64 {
        self.fixed.price_creation_ts
    }

    pub fn rung_count(&self) -> usize {
        self.fixed.rung_count as usize
    }

    /// Lazy iterator over the depth ladder
    pub fn rungs(&self) -> RungIter<'a> {
        RungIter {
            bytes: self.rung_bytes,
            index: 0,
        }
    }
}

/// Lazy rung iterator; each `next` is one unaligned-safe stack read
#[derive(Debug, Clone)]
pub struct RungIter<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl Iterator for RungIter<'_> {
    type Item = Rung;

    fn next(&mut self) -> Option<Rung> {
        let start = self.index * Rung::SIZE;
        if start + Rung::SIZE > self.bytes.len() {
            return None;
        }
        let rung = Rung::read_from(&self.bytes[start..start + Rung::SIZE])?;
        self.index += 1;
        Some(rung)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() / Rung::SIZE - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RungIter<'_> {}
