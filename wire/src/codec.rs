//! Length-prefixed framing for data units.
//!
//! Wire frame layout: a 4-byte big-endian unsigned length immediately
//! followed by exactly that many payload bytes. No magic number, no
//! checksum, no other header fields.

use bytes::Buf;
use bytes::BufMut;

use crate::error::ProtocolError;

/// Size of the length header on the wire.
pub const HEADER_SIZE: usize = 4;

/// Largest frame the transport will carry, header included.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Largest payload that fits a frame together with its header.
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - HEADER_SIZE;

/// One logical record: a declared length plus its payload bytes.
///
/// Every unit produced by [`FrameCodec::decode`] satisfies
/// `length == payload.len()`; [`DataUnit::new`] establishes the same by
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataUnit {
    pub length: u32,
    pub payload: bytes::Bytes,
}

impl DataUnit {
    pub fn new(payload: bytes::Bytes) -> Self {
        let length = u32::try_from(payload.len())
            .expect("payload larger than the wire format can describe");
        Self { length, payload }
    }

    /// Total size of this unit on the wire, header included.
    pub fn frame_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Big-endian length from the first `HEADER_SIZE` bytes of `data`.
///
/// Pure function, no codec state involved. Returns `None` when fewer than
/// 4 bytes are supplied; bytes beyond the header are ignored.
pub fn decode_header(data: &[u8]) -> Option<u32> {
    let header: [u8; HEADER_SIZE] = data.get(..HEADER_SIZE)?.try_into().ok()?;
    Some(u32::from_be_bytes(header))
}

/// Framing codec owning the pending-bytes accumulator.
///
/// TCP preserves no message boundaries: a unit may arrive split across many
/// reads, or several units may arrive in one. [`decode`](Self::decode)
/// buffers whatever it is given and surfaces at most one complete unit per
/// call; anything beyond that stays buffered for subsequent calls.
///
/// The codec also implements [`tokio_util::codec::Decoder`] and
/// [`tokio_util::codec::Encoder`], so it composes with `FramedRead` /
/// `FramedWrite` where a stream-shaped interface fits better.
#[derive(Debug, Default)]
pub struct FrameCodec {
    pending: bytes::BytesMut,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self {
            pending: bytes::BytesMut::with_capacity(MAX_FRAME_SIZE),
        }
    }

    /// Serializes a unit into its wire frame.
    ///
    /// The declared `length` field is written as-is; bounding it is the
    /// producer's job (see [`crate::provider::DataProvider`]), not the
    /// codec's.
    pub fn encode(&self, unit: &DataUnit) -> bytes::Bytes {
        let mut frame = bytes::BytesMut::with_capacity(unit.frame_size());
        frame.put_u32(unit.length);
        frame.extend_from_slice(&unit.payload);
        frame.freeze()
    }

    /// Appends `chunk` to the pending buffer and pops at most one unit.
    ///
    /// Returns `None` while the buffer holds less than one complete frame;
    /// no bytes are ever discarded. A buffer holding several complete
    /// frames surfaces them one call at a time - keep calling with an
    /// empty chunk to drain.
    pub fn decode(&mut self, chunk: &[u8]) -> Option<DataUnit> {
        self.pending.extend_from_slice(chunk);
        pop_frame(&mut self.pending)
    }

    /// Bytes received but not yet assembled into a complete unit.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

fn pop_frame(buffer: &mut bytes::BytesMut) -> Option<DataUnit> {
    let length = decode_header(buffer)?;
    let frame_size = HEADER_SIZE + length as usize;
    if buffer.len() < frame_size {
        return None;
    }
    buffer.advance(HEADER_SIZE);
    let payload = buffer.split_to(length as usize).freeze();
    Some(DataUnit { length, payload })
}

impl tokio_util::codec::Decoder for FrameCodec {
    type Item = DataUnit;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut bytes::BytesMut) -> Result<Option<DataUnit>, ProtocolError> {
        Ok(pop_frame(src))
    }
}

impl tokio_util::codec::Encoder<DataUnit> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, unit: DataUnit, dst: &mut bytes::BytesMut) -> Result<(), ProtocolError> {
        dst.reserve(HEADER_SIZE + unit.payload.len());
        dst.put_u32(unit.length);
        dst.extend_from_slice(&unit.payload);
        Ok(())
    }
}
