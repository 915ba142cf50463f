//! Frame encoders
//!
//! Each encoder writes header + payload into a caller buffer at an offset and
//! returns the total encoded length. The quote encoder is a builder because
//! its rung group is variable length; the fixed-size messages are one-shot
//! functions over their zerocopy structs.

use crate::error::{CodecError, CodecResult};
use types::{
    ClientTierConfigMsg, ConfigLoadCompleteMsg, CurrencyConfigMsg, HeartbeatMsg, MessageHeader,
    QuoteMsg, Rung, Symbol, TemplateId, MAX_RUNGS,
};
use zerocopy::AsBytes;

fn write_struct<T: AsBytes>(
    buf: &mut [u8],
    offset: usize,
    value: &T,
    context: &'static str,
) -> CodecResult<()> {
    let bytes = value.as_bytes();
    let end = offset + bytes.len();
    if end > buf.len() {
        return Err(CodecError::BufferTooSmall {
            need: end - offset,
            got: buf.len().saturating_sub(offset),
            offset,
            context,
        });
    }
    buf[offset..end].copy_from_slice(bytes);
    Ok(())
}

fn encode_fixed<T: AsBytes>(
    buf: &mut [u8],
    offset: usize,
    template: TemplateId,
    block_length: usize,
    payload: &T,
    context: &'static str,
) -> CodecResult<usize> {
    let header = MessageHeader::new(template, block_length as u16);
    write_struct(buf, offset, &header, context)?;
    write_struct(buf, offset + MessageHeader::SIZE, payload, context)?;
    Ok(MessageHeader::SIZE + block_length)
}

/// Encode a heartbeat frame; returns encoded length
pub fn encode_heartbeat(buf: &mut [u8], offset: usize, msg: &HeartbeatMsg) -> CodecResult<usize> {
    encode_fixed(
        buf,
        offset,
        TemplateId::Heartbeat,
        HeartbeatMsg::BLOCK_LENGTH,
        msg,
        "heartbeat encode",
    )
}

/// Encode a currency configuration frame; returns encoded length
pub fn encode_currency_config(
    buf: &mut [u8],
    offset: usize,
    msg: &CurrencyConfigMsg,
) -> CodecResult<usize> {
    encode_fixed(
        buf,
        offset,
        TemplateId::CurrencyConfig,
        CurrencyConfigMsg::BLOCK_LENGTH,
        msg,
        "currency config encode",
    )
}

/// Encode a client tier configuration frame; returns encoded length
pub fn encode_client_tier_config(
    buf: &mut [u8],
    offset: usize,
    msg: &ClientTierConfigMsg,
) -> CodecResult<usize> {
    encode_fixed(
        buf,
        offset,
        TemplateId::ClientTierConfig,
        ClientTierConfigMsg::BLOCK_LENGTH,
        msg,
        "client tier config encode",
    )
}

/// Encode the end-of-replay sentinel; returns encoded length
pub fn encode_config_load_complete(
    buf: &mut [u8],
    offset: usize,
    msg: &ConfigLoadCompleteMsg,
) -> CodecResult<usize> {
    encode_fixed(
        buf,
        offset,
        TemplateId::ConfigLoadComplete,
        ConfigLoadCompleteMsg::BLOCK_LENGTH,
        msg,
        "config load complete encode",
    )
}

/// Builder for quote frames with a variable-length rung group
///
/// Writes header and fixed block on `begin`, then appends rungs in place.
/// The rung count byte in the buffer is kept current so the frame is valid
/// after every `add_rung`.
#[derive(Debug)]
pub struct QuoteWriter<'a> {
    buf: &'a mut [u8],
    offset: usize,
    rung_count: usize,
}

impl<'a> QuoteWriter<'a> {
    /// Start a quote frame at `offset`; rungs are appended with [`Self::add_rung`]
    pub fn begin(
        buf: &'a mut [u8],
        offset: usize,
        symbol: Symbol,
        value_date: i64,
        tenor: u16,
        client_tier: u16,
        price_creation_ts: u64,
    ) -> CodecResult<Self> {
        let fixed = QuoteMsg {
            symbol: symbol.raw(),
            value_date,
            price_creation_ts,
            tenor,
            client_tier,
            rung_count: 0,
            _padding: [0; 3],
        };
        let header = MessageHeader::new(TemplateId::Quote, QuoteMsg::BLOCK_LENGTH as u16);
        write_struct(buf, offset, &header, "quote encode")?;
        write_struct(buf, offset + MessageHeader::SIZE, &fixed, "quote encode")?;
        Ok(Self {
            buf,
            offset,
            rung_count: 0,
        })
    }

    /// Append one ladder level; errors once the wire cap is reached
    pub fn add_rung(&mut self, rung: Rung) -> CodecResult<&mut Self> {
        if self.rung_count == MAX_RUNGS {
            return Err(CodecError::TooManyRungs {
                count: self.rung_count + 1,
                cap: MAX_RUNGS,
            });
        }
        let rung_offset = self.offset
            + MessageHeader::SIZE
            + QuoteMsg::BLOCK_LENGTH
            + self.rung_count * Rung::SIZE;
        write_struct(self.buf, rung_offset, &rung, "quote rung encode")?;
        self.rung_count += 1;
        // rung_count is the last meaningful byte of the fixed block
        self.buf[self.offset + MessageHeader::SIZE + QuoteMsg::BLOCK_LENGTH - 4] =
            self.rung_count as u8;
        Ok(self)
    }

    /// Total encoded length of the frame built so far
    pub fn encoded_length(&self) -> usize {
        MessageHeader::SIZE + QuoteMsg::BLOCK_LENGTH + self.rung_count * Rung::SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{decode_frame, Frame};

    #[test]
    fn quote_writer_tracks_length_per_rung() {
        let mut buf = [0u8; 512];
        let symbol = Symbol::new("EURUSD").unwrap();
        let mut writer = QuoteWriter::begin(&mut buf, 0, symbol, 19_900, 0, 3, 42).unwrap();
        assert_eq!(
            writer.encoded_length(),
            MessageHeader::SIZE + QuoteMsg::BLOCK_LENGTH
        );
        writer.add_rung(Rung::new(1.1000, 1.1002, 1_000_000)).unwrap();
        writer.add_rung(Rung::new(1.0999, 1.1003, 5_000_000)).unwrap();
        assert_eq!(
            writer.encoded_length(),
            MessageHeader::SIZE + QuoteMsg::BLOCK_LENGTH + 2 * Rung::SIZE
        );
    }

    #[test]
    fn eleventh_rung_is_a_construction_error() {
        let mut buf = [0u8; 512];
        let symbol = Symbol::new("USDJPY").unwrap();
        let mut writer = QuoteWriter::begin(&mut buf, 0, symbol, 19_900, 0, 1, 7).unwrap();
        for _ in 0..MAX_RUNGS {
            writer.add_rung(Rung::new(145.0, 145.02, 1_000_000)).unwrap();
        }
        let err = writer
            .add_rung(Rung::new(145.0, 145.02, 1_000_000))
            .unwrap_err();
        assert!(matches!(err, CodecError::TooManyRungs { cap: 10, .. }));
    }

    #[test]
    fn quote_written_at_offset_decodes_from_offset() {
        let mut buf = [0u8; 512];
        let symbol = Symbol::new("GBPUSD").unwrap();
        let len = {
            let mut writer = QuoteWriter::begin(&mut buf, 64, symbol, 20_000, 7, 2, 99).unwrap();
            writer.add_rung(Rung::new(1.25, 1.2502, 2_000_000)).unwrap();
            writer.encoded_length()
        };
        match decode_frame(&buf[64..64 + len]).unwrap() {
            Frame::Quote(view) => {
                assert_eq!(view.symbol().as_str(), "GBPUSD");
                assert_eq!(view.value_date(), 20_000);
                assert_eq!(view.tenor(), 7);
                assert_eq!(view.client_tier(), 2);
                assert_eq!(view.price_creation_ts(), 99);
                assert_eq!(view.rung_count(), 1);
            }
            other => panic!("expected quote frame, got {other:?}"),
        }
    }

    #[test]
    fn undersized_buffer_is_rejected_before_writing() {
        let mut buf = [0u8; 8];
        let msg = HeartbeatMsg {
            timestamp: 1,
            app_id: 4,
            _padding: [0; 4],
        };
        let err = encode_heartbeat(&mut buf, 0, &msg).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooSmall { .. }));
    }
}
