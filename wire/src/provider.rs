//! Send-side pipeline: produces validated outbound wire frames.

use tracing::instrument;

use crate::codec;
use crate::error::ProtocolError;
use crate::unitfile;

/// Produces the next outbound wire frame from the source file, or `None`
/// once the file is exhausted.
///
/// Every block is decoded once purely for validation; what goes on the
/// wire is the original block, byte for byte.
#[derive(Debug)]
pub struct DataProvider {
    reader: unitfile::UnitFileReader,
    codec: codec::FrameCodec,
}

impl DataProvider {
    pub fn new(reader: unitfile::UnitFileReader) -> Self {
        Self {
            reader,
            codec: codec::FrameCodec::new(),
        }
    }

    /// Returns the next validated frame, `None` at end of data.
    ///
    /// Fails with a [`ProtocolError`] when the block does not decode to a
    /// data unit, or the unit violates the transport's payload limit.
    #[instrument(level = "trace", skip(self))]
    pub async fn next_frame(&mut self) -> anyhow::Result<Option<bytes::Bytes>> {
        let Some(block) = self.reader.read_next_frame().await? else {
            return Ok(None);
        };
        validate_block(&mut self.codec, &block)?;
        tracing::trace!("validated data unit block of {} bytes", block.len());
        Ok(Some(block))
    }
}

fn validate_block(codec: &mut codec::FrameCodec, block: &[u8]) -> Result<(), ProtocolError> {
    let Some(unit) = codec.decode(block) else {
        return Err(ProtocolError::Malformed { size: block.len() });
    };
    if unit.length as usize > codec::MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::Oversize {
            length: unit.length,
            max: codec::MAX_PAYLOAD_SIZE,
        });
    }
    if unit.length as usize != unit.payload.len() {
        return Err(ProtocolError::LengthMismatch {
            declared: unit.length,
            actual: unit.payload.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(payload: &[u8]) -> Vec<u8> {
        let mut block = (payload.len() as u32).to_be_bytes().to_vec();
        block.extend_from_slice(payload);
        block
    }

    #[tokio::test]
    async fn returns_blocks_verbatim_then_none() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("units.bin");
        let mut contents = frame(b"Hi");
        contents.extend_from_slice(&frame(b"ABCDE"));
        tokio::fs::write(&path, &contents).await?;

        let reader = unitfile::UnitFileReader::open(&path).await?;
        let mut provider = DataProvider::new(reader);
        let first = provider.next_frame().await?.expect("first block");
        assert_eq!(&first[..], &frame(b"Hi")[..]);
        let second = provider.next_frame().await?.expect("second block");
        assert_eq!(&second[..], &frame(b"ABCDE")[..]);
        assert!(provider.next_frame().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unit_larger_than_the_transport_limit() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("oversize.bin");
        let payload = vec![0xABu8; codec::MAX_PAYLOAD_SIZE + 1];
        tokio::fs::write(&path, frame(&payload)).await?;

        let reader = unitfile::UnitFileReader::open(&path).await?;
        let mut provider = DataProvider::new(reader);
        let error = provider.next_frame().await.expect_err("oversize unit");
        assert!(matches!(
            error.downcast_ref::<ProtocolError>(),
            Some(ProtocolError::Oversize { .. })
        ));
        Ok(())
    }

    #[test]
    fn rejects_block_shorter_than_its_declared_length() {
        // declared length 5 but only 2 payload bytes present
        let mut frame_codec = codec::FrameCodec::new();
        let block = [0x00, 0x00, 0x00, 0x05, b'A', b'B'];
        let error = validate_block(&mut frame_codec, &block).expect_err("incomplete block");
        assert!(matches!(error, ProtocolError::Malformed { size: 6 }));
    }

    #[test]
    fn accepts_maximum_size_unit() {
        let mut frame_codec = codec::FrameCodec::new();
        let payload = vec![0u8; codec::MAX_PAYLOAD_SIZE];
        assert!(validate_block(&mut frame_codec, &frame(&payload)).is_ok());
    }
}
