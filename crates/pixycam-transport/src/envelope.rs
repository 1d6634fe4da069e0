use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, TransportError};

/// Envelope header: magic (2) + kind (1) + body length (4) = 7 bytes.
pub const HEADER_SIZE: usize = 7;

/// Magic bytes: "PX" (0x50 0x58).
pub const MAGIC: [u8; 2] = [0x50, 0x58];

/// Bridge protocol version spoken by this crate.
pub const PROTOCOL_VERSION: u16 = 1;

/// Longest procedure name that fits the one-byte name length.
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Device status values carried in a REPLY body.
///
/// These mirror the libusb-derived codes the sensor firmware reports.
pub mod status {
    pub const OK: i32 = 0;
    pub const IO: i32 = -1;
    pub const NO_DEVICE: i32 = -4;
    pub const NOT_FOUND: i32 = -5;
    pub const BUSY: i32 = -6;
    pub const PROTOCOL: i32 = -151;
    pub const INVALID_COMMAND: i32 = -152;
}

/// Envelope kinds exchanged with the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EnvelopeKind {
    /// Host greeting carrying the protocol version.
    Hello = 0x01,
    /// Named procedure call.
    Call = 0x02,
    /// Host is going away.
    Bye = 0x03,
    /// Bridge greeting reply.
    HelloAck = 0x81,
    /// Procedure reply: status then encoded results.
    Reply = 0x82,
}

impl EnvelopeKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Hello),
            0x02 => Some(Self::Call),
            0x03 => Some(Self::Bye),
            0x81 => Some(Self::HelloAck),
            0x82 => Some(Self::Reply),
            _ => None,
        }
    }
}

/// One framed message between host and bridge.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub body: Bytes,
}

impl Envelope {
    /// The total wire size of this envelope (header + body).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.body.len()
    }
}

/// Encode an envelope into the wire format.
///
/// ```text
/// ┌────────────┬──────────┬────────────┬──────────────┐
/// │ Magic (2B) │ Kind(1B) │ Length     │ Body         │
/// │ 0x50 0x58  │          │ (4B LE)    │ (Length B)   │
/// └────────────┴──────────┴────────────┴──────────────┘
/// ```
pub fn encode_envelope(kind: EnvelopeKind, body: &[u8], dst: &mut BytesMut) -> Result<()> {
    put_header(kind, body.len(), dst)?;
    dst.put_slice(body);
    Ok(())
}

/// Decode an envelope from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't hold a complete envelope yet.
/// On success, consumes the envelope bytes from the buffer.
pub fn decode_envelope(src: &mut BytesMut, max_body: usize) -> Result<Option<Envelope>> {
    if src.len() < HEADER_SIZE {
        return Ok(None);
    }

    if src[0..2] != MAGIC {
        return Err(TransportError::Malformed("invalid magic"));
    }
    let kind = EnvelopeKind::from_u8(src[2]).ok_or(TransportError::Malformed("unknown kind"))?;
    let body_len = u32::from_le_bytes([src[3], src[4], src[5], src[6]]) as usize;

    if body_len > max_body {
        return Err(TransportError::BodyTooLarge {
            size: body_len,
            max: max_body,
        });
    }

    if src.len() < HEADER_SIZE + body_len {
        return Ok(None);
    }

    src.advance(HEADER_SIZE);
    let body = src.split_to(body_len).freeze();

    Ok(Some(Envelope { kind, body }))
}

/// Encode a HELLO or HELLO_ACK envelope.
pub fn encode_hello(kind: EnvelopeKind, version: u16, dst: &mut BytesMut) -> Result<()> {
    encode_envelope(kind, &version.to_le_bytes(), dst)
}

/// Read the protocol version from a HELLO or HELLO_ACK body.
pub fn parse_hello(body: &[u8]) -> Result<u16> {
    match body {
        [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(TransportError::Malformed("hello body must be 2 bytes")),
    }
}

/// Encode a CALL envelope: name length, name, encoded arguments.
pub fn encode_call(name: &str, args: &[u8], dst: &mut BytesMut) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(TransportError::Malformed("procedure name must be 1..=255 bytes"));
    }
    put_header(EnvelopeKind::Call, 1 + name.len() + args.len(), dst)?;
    dst.put_u8(name.len() as u8);
    dst.put_slice(name.as_bytes());
    dst.put_slice(args);
    Ok(())
}

/// Split a CALL body into the procedure name and its encoded arguments.
pub fn parse_call(mut body: Bytes) -> Result<(String, Bytes)> {
    if body.is_empty() {
        return Err(TransportError::Malformed("empty call body"));
    }
    let name_len = body.get_u8() as usize;
    if body.len() < name_len {
        return Err(TransportError::Malformed("call name truncated"));
    }
    let name = body.split_to(name_len);
    let name = std::str::from_utf8(&name)
        .map_err(|_| TransportError::Malformed("call name is not UTF-8"))?
        .to_string();
    Ok((name, body))
}

/// Encode a REPLY envelope: status then encoded results.
pub fn encode_reply(status: i32, results: &[u8], dst: &mut BytesMut) -> Result<()> {
    put_header(EnvelopeKind::Reply, 4 + results.len(), dst)?;
    dst.put_i32_le(status);
    dst.put_slice(results);
    Ok(())
}

/// Split a REPLY body into the device status and the encoded results.
pub fn parse_reply(mut body: Bytes) -> Result<(i32, Bytes)> {
    if body.len() < 4 {
        return Err(TransportError::Malformed("reply body shorter than status"));
    }
    let status = body.get_i32_le();
    Ok((status, body))
}

/// Map a non-zero device status from a REPLY to a transport error.
pub fn status_to_error(status: i32, name: &str) -> TransportError {
    match status {
        status::IO => TransportError::Io(std::io::Error::other("device reported I/O failure")),
        status::NO_DEVICE => TransportError::NoDevice,
        status::NOT_FOUND => TransportError::NotFound,
        status::BUSY => TransportError::Busy,
        status::PROTOCOL => TransportError::Protocol(name.to_string()),
        status::INVALID_COMMAND => TransportError::InvalidCommand(name.to_string()),
        other => TransportError::Device(other),
    }
}

fn put_header(kind: EnvelopeKind, body_len: usize, dst: &mut BytesMut) -> Result<()> {
    if body_len > u32::MAX as usize {
        return Err(TransportError::BodyTooLarge {
            size: body_len,
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + body_len);
    dst.put_slice(&MAGIC);
    dst.put_u8(kind as u8);
    dst.put_u32_le(body_len as u32);
    Ok(())
}
