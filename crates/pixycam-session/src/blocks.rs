use bytes::{Buf, BufMut};
use pixycam_chirp::schema::BLK_GET_BLOCKS;
use pixycam_chirp::Call;
use pixycam_transport::Link;
use tracing::{trace, warn};

use crate::error::{Result, SessionError};
use crate::session::Session;

/// Size of one packed block record: seven little-endian 16-bit fields.
pub const BLOCK_RECORD_SIZE: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    /// Single color signature.
    #[default]
    Normal,
    /// Color code; `angle` is meaningful.
    ColorCode,
}

impl BlockKind {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(BlockKind::Normal),
            1 => Some(BlockKind::ColorCode),
            _ => None,
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            BlockKind::Normal => 0,
            BlockKind::ColorCode => 1,
        }
    }
}

/// One detected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Block {
    pub kind: BlockKind,
    pub signature: u16,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub angle: i16,
}

impl Block {
    /// Parse one packed record. `record` must be [`BLOCK_RECORD_SIZE`] bytes.
    pub fn from_record(mut record: &[u8]) -> Result<Self> {
        if record.len() != BLOCK_RECORD_SIZE {
            return Err(SessionError::Protocol(format!(
                "block record is {} bytes, expected {BLOCK_RECORD_SIZE}",
                record.len()
            )));
        }
        let raw_kind = record.get_u16_le();
        let kind = BlockKind::from_u16(raw_kind)
            .ok_or_else(|| SessionError::Protocol(format!("unknown block kind {raw_kind}")))?;
        Ok(Block {
            kind,
            signature: record.get_u16_le(),
            x: record.get_u16_le(),
            y: record.get_u16_le(),
            width: record.get_u16_le(),
            height: record.get_u16_le(),
            angle: record.get_i16_le(),
        })
    }

    /// The packed wire record, as a device sends it.
    pub fn to_record(&self) -> [u8; BLOCK_RECORD_SIZE] {
        let mut record = [0u8; BLOCK_RECORD_SIZE];
        let mut dst = &mut record[..];
        dst.put_u16_le(self.kind.as_u16());
        dst.put_u16_le(self.signature);
        dst.put_u16_le(self.x);
        dst.put_u16_le(self.y);
        dst.put_u16_le(self.width);
        dst.put_u16_le(self.height);
        dst.put_i16_le(self.angle);
        record
    }
}

impl<L: Link> Session<L> {
    /// Poll the device for detected objects.
    ///
    /// Copies `count = min(device count, max_blocks)` blocks into
    /// `dest[..count]` and returns `count`. Nothing past `dest[count]` is
    /// written. `max_blocks` larger than `dest` is rejected before any I/O.
    pub fn get_blocks(&mut self, max_blocks: u16, dest: &mut [Block]) -> Result<usize> {
        let max = usize::from(max_blocks);
        if max > dest.len() {
            return Err(SessionError::InvalidParameter(format!(
                "max_blocks {max} exceeds destination capacity {}",
                dest.len()
            )));
        }

        let call = Call::new(BLK_GET_BLOCKS).arg(max_blocks).build()?;
        let reply = self.call(&call)?;
        let response = reply.i32(0)?;
        if response < 0 {
            return Err(SessionError::Remote(response));
        }

        let reported = response as usize;
        if reported > max {
            warn!(reported, max, "device reported more blocks than requested");
        }
        let count = reported.min(max);

        let payload = reply.bytes(1)?;
        let needed = count * BLOCK_RECORD_SIZE;
        if payload.len() < needed {
            return Err(SessionError::Protocol(format!(
                "block payload holds {} bytes, {count} blocks need {needed}",
                payload.len()
            )));
        }

        for (slot, record) in dest[..count]
            .iter_mut()
            .zip(payload.chunks_exact(BLOCK_RECORD_SIZE))
        {
            *slot = Block::from_record(record)?;
        }
        trace!(count, "blocks copied");
        Ok(count)
    }

    /// Poll for up to `max_blocks` blocks into a fresh vector.
    pub fn blocks(&mut self, max_blocks: u16) -> Result<Vec<Block>> {
        let mut dest = vec![Block::default(); usize::from(max_blocks)];
        let count = self.get_blocks(max_blocks, &mut dest)?;
        dest.truncate(count);
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use pixycam_chirp::ResultValue;

    use super::*;
    use crate::status::StatusCode;
    use crate::testing::ScriptedLink;

    fn sample(signature: u16) -> Block {
        Block {
            kind: BlockKind::Normal,
            signature,
            x: 160,
            y: 100,
            width: 20,
            height: 12,
            angle: 0,
        }
    }

    fn payload(blocks: &[Block]) -> Vec<u8> {
        blocks.iter().flat_map(|b| b.to_record()).collect()
    }

    fn session_with(link: ScriptedLink) -> Session<ScriptedLink> {
        let mut session = Session::new(link);
        session.open().unwrap();
        session
    }

    #[test]
    fn record_layout() {
        let block = Block {
            kind: BlockKind::ColorCode,
            signature: 0o12,
            x: 1,
            y: 2,
            width: 3,
            height: 4,
            angle: -90,
        };
        let record = block.to_record();
        assert_eq!(
            record,
            [1, 0, 10, 0, 1, 0, 2, 0, 3, 0, 4, 0, 0xA6, 0xFF]
        );
        assert_eq!(Block::from_record(&record).unwrap(), block);
    }

    #[test]
    fn copies_reported_blocks() {
        let found = [sample(1), sample(2), sample(3)];
        let bytes = payload(&found);
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(3), ResultValue::Bytes(&bytes)]),
        );

        let mut dest = [Block::default(); 25];
        let count = session.get_blocks(25, &mut dest).unwrap();
        assert_eq!(count, 3);
        assert_eq!(&dest[..3], &found);
        assert!(dest[3..].iter().all(|b| *b == Block::default()));

        let (name, args) = &session.link().calls[0];
        assert_eq!(name, "blk_getBlocks");
        assert_eq!(args, &[0x02, 25, 0, 0x00]);
    }

    #[test]
    fn never_writes_past_max() {
        let found = [sample(1), sample(2), sample(3), sample(4)];
        let bytes = payload(&found);
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(4), ResultValue::Bytes(&bytes)]),
        );

        let marker = sample(99);
        let mut dest = [marker; 5];
        let count = session.get_blocks(2, &mut dest).unwrap();
        assert_eq!(count, 2);
        assert_eq!(&dest[..2], &found[..2]);
        assert!(dest[2..].iter().all(|b| *b == marker));
    }

    #[test]
    fn max_larger_than_destination_is_rejected_locally() {
        let mut session = session_with(ScriptedLink::new());
        let mut dest = [Block::default(); 4];
        let err = session.get_blocks(5, &mut dest).unwrap_err();
        assert_eq!(err.status(), StatusCode::InvalidParameter);
        assert!(session.link().calls.is_empty());
    }

    #[test]
    fn zero_blocks() {
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(0), ResultValue::Bytes(&[])]),
        );
        assert!(session.blocks(10).unwrap().is_empty());
    }

    #[test]
    fn negative_response_is_remote_error() {
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(-6), ResultValue::Bytes(&[])]),
        );
        let err = session.blocks(10).unwrap_err();
        assert!(matches!(err, SessionError::Remote(-6)));
        assert_eq!(err.status(), StatusCode::UsbBusy);
    }

    #[test]
    fn short_payload_is_protocol_error() {
        let bytes = payload(&[sample(1)]);
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(2), ResultValue::Bytes(&bytes)]),
        );
        let err = session.blocks(10).unwrap_err();
        assert_eq!(err.status(), StatusCode::ChirpProtocolError);
    }

    #[test]
    fn unknown_kind_is_protocol_error() {
        let mut record = sample(1).to_record();
        record[0] = 7;
        let mut session = session_with(
            ScriptedLink::new().reply(&[ResultValue::I32(1), ResultValue::Bytes(&record)]),
        );
        let err = session.blocks(1).unwrap_err();
        assert!(matches!(err, SessionError::Protocol(_)));
    }
}
