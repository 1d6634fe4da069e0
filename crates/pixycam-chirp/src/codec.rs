use bytes::{Buf, BufMut, BytesMut};
use tracing::debug;

use crate::error::{ChirpError, Result};
use crate::value::{ResultValue, Value, ValueKind};

/// End-of-list marker for both argument and result lists.
pub const SENTINEL: u8 = 0x00;

/// Tag for a length-prefixed byte array.
pub const ARRAY_TAG: u8 = 0x81;

/// Encode an out-argument list: each value as tag + little-endian bytes,
/// followed by the sentinel. There is no count prefix.
pub fn encode_arguments(args: &[Value], dst: &mut BytesMut) {
    dst.reserve(args.len() * 5 + 1);
    for arg in args {
        arg.put(dst);
    }
    dst.put_u8(SENTINEL);
}

/// Encode an in-result list the way a device replies.
///
/// Used by bridges and test doubles that play the device side.
pub fn encode_results(values: &[ResultValue<'_>], dst: &mut BytesMut) {
    for value in values {
        value.put(dst);
    }
    dst.put_u8(SENTINEL);
}

/// Decoded results of one call, in schema order.
///
/// Byte arrays borrow from the buffer the reply was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Results<'a> {
    values: Vec<ResultValue<'a>>,
}

impl<'a> Results<'a> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ResultValue<'a>> {
        self.values.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultValue<'a>> {
        self.values.iter()
    }

    pub fn i8(&self, index: usize) -> Result<i8> {
        match self.get(index) {
            Some(ResultValue::I8(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::I8)),
        }
    }

    pub fn u8(&self, index: usize) -> Result<u8> {
        match self.get(index) {
            Some(ResultValue::U8(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::U8)),
        }
    }

    pub fn i16(&self, index: usize) -> Result<i16> {
        match self.get(index) {
            Some(ResultValue::I16(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::I16)),
        }
    }

    pub fn u16(&self, index: usize) -> Result<u16> {
        match self.get(index) {
            Some(ResultValue::U16(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::U16)),
        }
    }

    pub fn i32(&self, index: usize) -> Result<i32> {
        match self.get(index) {
            Some(ResultValue::I32(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::I32)),
        }
    }

    pub fn u32(&self, index: usize) -> Result<u32> {
        match self.get(index) {
            Some(ResultValue::U32(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::U32)),
        }
    }

    pub fn bytes(&self, index: usize) -> Result<&'a [u8]> {
        match self.get(index) {
            Some(ResultValue::Bytes(v)) => Ok(v),
            _ => Err(access_error(index, ValueKind::Bytes)),
        }
    }
}

fn access_error(index: usize, expected: ValueKind) -> ChirpError {
    ChirpError::ResultAccess { index, expected }
}

/// Decode a reply against the expected result kinds.
///
/// Every expected slot must be present with a matching tag. Values after
/// the last expected slot are skipped up to the sentinel, so firmware that
/// appends results still decodes.
pub fn decode_results<'a>(src: &'a [u8], kinds: &[ValueKind]) -> Result<Results<'a>> {
    let mut buf: &'a [u8] = src;
    let mut values = Vec::with_capacity(kinds.len());

    for (index, &expected) in kinds.iter().enumerate() {
        if !buf.has_remaining() || buf[0] == SENTINEL {
            return Err(ChirpError::MissingResult { index, expected });
        }
        let tag = buf.get_u8();
        if tag != expected.wire_tag() {
            return Err(ChirpError::KindMismatch {
                index,
                expected,
                tag,
            });
        }
        values.push(read_value(&mut buf, expected, index)?);
    }

    let mut skipped = 0usize;
    loop {
        if !buf.has_remaining() {
            return Err(ChirpError::MissingSentinel);
        }
        let offset = src.len() - buf.remaining();
        let tag = buf.get_u8();
        match tag {
            SENTINEL => break,
            0x01 | 0x02 | 0x04 => {
                let width = tag as usize;
                if buf.remaining() < width {
                    return Err(ChirpError::Truncated {
                        index: kinds.len() + skipped,
                    });
                }
                buf.advance(width);
            }
            ARRAY_TAG => {
                read_array(&mut buf, kinds.len() + skipped)?;
            }
            _ => return Err(ChirpError::UnknownTag { tag, offset }),
        }
        skipped += 1;
    }

    if skipped > 0 {
        debug!(skipped, "ignored trailing reply values");
    }

    Ok(Results { values })
}

fn read_value<'a>(buf: &mut &'a [u8], kind: ValueKind, index: usize) -> Result<ResultValue<'a>> {
    if let Some(width) = kind.width() {
        if buf.remaining() < width {
            return Err(ChirpError::Truncated { index });
        }
    }

    let value = match kind {
        ValueKind::I8 => ResultValue::I8(buf.get_i8()),
        ValueKind::U8 => ResultValue::U8(buf.get_u8()),
        ValueKind::I16 => ResultValue::I16(buf.get_i16_le()),
        ValueKind::U16 => ResultValue::U16(buf.get_u16_le()),
        ValueKind::I32 => ResultValue::I32(buf.get_i32_le()),
        ValueKind::U32 => ResultValue::U32(buf.get_u32_le()),
        ValueKind::Bytes => ResultValue::Bytes(read_array(buf, index)?),
    };
    Ok(value)
}

fn read_array<'a>(buf: &mut &'a [u8], index: usize) -> Result<&'a [u8]> {
    if buf.remaining() < 4 {
        return Err(ChirpError::Truncated { index });
    }
    let len = buf.get_u32_le() as usize;
    if buf.remaining() < len {
        return Err(ChirpError::Truncated { index });
    }
    let slice: &'a [u8] = *buf;
    let (head, rest) = slice.split_at(len);
    *buf = rest;
    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(values: &[ResultValue<'_>]) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_results(values, &mut buf);
        buf
    }

    #[test]
    fn encodes_get_frame_arguments() {
        let mut buf = BytesMut::new();
        encode_arguments(
            &[
                Value::U8(0x21),
                Value::U16(0),
                Value::U16(0),
                Value::U16(320),
                Value::U16(200),
            ],
            &mut buf,
        );
        assert_eq!(
            buf.as_ref(),
            &[
                0x01, 0x21, // mode
                0x02, 0x00, 0x00, // xoffset
                0x02, 0x00, 0x00, // yoffset
                0x02, 0x40, 0x01, // width
                0x02, 0xC8, 0x00, // height
                0x00, // sentinel
            ]
        );
    }

    #[test]
    fn empty_argument_list_is_just_the_sentinel() {
        let mut buf = BytesMut::new();
        encode_arguments(&[], &mut buf);
        assert_eq!(buf.as_ref(), &[SENTINEL]);
    }

    #[test]
    fn decodes_scalars_and_borrowed_bytes() {
        let wire = reply(&[
            ResultValue::I32(0),
            ResultValue::U32(0xDEAD_BEEF),
            ResultValue::Bytes(&[1, 2, 3]),
        ]);
        let results = decode_results(
            &wire,
            &[ValueKind::I32, ValueKind::U32, ValueKind::Bytes],
        )
        .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results.i32(0).unwrap(), 0);
        assert_eq!(results.u32(1).unwrap(), 0xDEAD_BEEF);
        let bytes = results.bytes(2).unwrap();
        assert_eq!(bytes, &[1, 2, 3]);
        // No copy: the slice points into the reply buffer.
        let start = wire.as_ptr() as usize;
        let ptr = bytes.as_ptr() as usize;
        assert!(ptr >= start && ptr < start + wire.len());
    }

    #[test]
    fn signed_results_keep_their_sign() {
        let wire = reply(&[ResultValue::I8(-5), ResultValue::I16(-300)]);
        let results = decode_results(&wire, &[ValueKind::I8, ValueKind::I16]).unwrap();
        assert_eq!(results.i8(0).unwrap(), -5);
        assert_eq!(results.i16(1).unwrap(), -300);
    }

    #[test]
    fn sentinel_before_last_slot_is_missing_result() {
        let wire = reply(&[ResultValue::I32(0)]);
        let err = decode_results(&wire, &[ValueKind::I32, ValueKind::U32]).unwrap_err();
        assert!(matches!(
            err,
            ChirpError::MissingResult {
                index: 1,
                expected: ValueKind::U32
            }
        ));
    }

    #[test]
    fn width_mismatch_is_detected() {
        let wire = reply(&[ResultValue::U16(7)]);
        let err = decode_results(&wire, &[ValueKind::I32]).unwrap_err();
        assert!(matches!(err, ChirpError::KindMismatch { index: 0, tag: 0x02, .. }));
    }

    #[test]
    fn truncated_scalar() {
        let wire = [0x04, 0x01, 0x02];
        let err = decode_results(&wire, &[ValueKind::I32]).unwrap_err();
        assert!(matches!(err, ChirpError::Truncated { index: 0 }));
    }

    #[test]
    fn truncated_array() {
        let wire = [ARRAY_TAG, 0x10, 0x00, 0x00, 0x00, 0xAA];
        let err = decode_results(&wire, &[ValueKind::Bytes]).unwrap_err();
        assert!(matches!(err, ChirpError::Truncated { index: 0 }));
    }

    #[test]
    fn trailing_values_are_skipped() {
        let wire = reply(&[
            ResultValue::I32(3),
            ResultValue::U8(9),
            ResultValue::Bytes(b"extra"),
        ]);
        let results = decode_results(&wire, &[ValueKind::I32]).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.i32(0).unwrap(), 3);
    }

    #[test]
    fn missing_sentinel_is_rejected() {
        let mut wire = reply(&[ResultValue::I32(1)]);
        wire.truncate(wire.len() - 1);
        let err = decode_results(&wire, &[ValueKind::I32]).unwrap_err();
        assert!(matches!(err, ChirpError::MissingSentinel));
    }

    #[test]
    fn unknown_trailing_tag_is_rejected() {
        let wire = [0x04, 0, 0, 0, 0, 0x33, 0x00];
        let err = decode_results(&wire, &[ValueKind::I32]).unwrap_err();
        assert!(matches!(err, ChirpError::UnknownTag { tag: 0x33, offset: 5 }));
    }

    #[test]
    fn wrong_accessor_is_an_error() {
        let wire = reply(&[ResultValue::I32(1)]);
        let results = decode_results(&wire, &[ValueKind::I32]).unwrap();
        assert!(matches!(
            results.u32(0),
            Err(ChirpError::ResultAccess { index: 0, .. })
        ));
        assert!(results.bytes(5).is_err());
    }
}
