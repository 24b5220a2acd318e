//! Sequential file collaborators for framed data unit blocks.
//!
//! The reader isolates one `[header + payload]` block per call by reading
//! the 4-byte length then exactly that many payload bytes; the writer
//! appends blocks verbatim and flushes per call.

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;

use crate::codec;

/// Reads complete wire frames from a file, one block per call.
#[derive(Debug)]
pub struct UnitFileReader {
    file: tokio::io::BufReader<tokio::fs::File>,
    path: std::path::PathBuf,
}

impl UnitFileReader {
    pub async fn open(path: &std::path::Path) -> anyhow::Result<Self> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open {path:?} for reading"))?;
        Ok(Self {
            file: tokio::io::BufReader::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Returns the next `[header + payload]` block, or `None` at a clean
    /// end of file.
    ///
    /// Clean means positioned exactly at a block boundary; a file that
    /// ends in the middle of a block is an error, not end-of-data.
    pub async fn read_next_frame(&mut self) -> anyhow::Result<Option<bytes::Bytes>> {
        let mut header = [0u8; codec::HEADER_SIZE];
        let mut filled = 0;
        while filled < header.len() {
            let n = self
                .file
                .read(&mut header[filled..])
                .await
                .with_context(|| format!("failed to read from {:?}", self.path))?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                anyhow::bail!(
                    "{:?} ends mid-block: got {} of {} header bytes",
                    self.path,
                    filled,
                    header.len()
                );
            }
            filled += n;
        }
        let length = u32::from_be_bytes(header) as usize;
        let mut block = bytes::BytesMut::with_capacity(codec::HEADER_SIZE + length);
        block.extend_from_slice(&header);
        block.resize(codec::HEADER_SIZE + length, 0);
        if length > 0 {
            self.file
                .read_exact(&mut block[codec::HEADER_SIZE..])
                .await
                .map_err(|error| match error.kind() {
                    std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!(
                        "{:?} ends mid-block: header declares {} payload bytes",
                        self.path,
                        length
                    ),
                    _ => anyhow::Error::from(error)
                        .context(format!("failed to read from {:?}", self.path)),
                })?;
        }
        Ok(Some(block.freeze()))
    }
}

/// Appends wire frames to a file, flushing per call.
#[derive(Debug)]
pub struct UnitFileWriter {
    file: tokio::io::BufWriter<tokio::fs::File>,
    path: std::path::PathBuf,
    bytes_written: u64,
}

impl UnitFileWriter {
    pub async fn create(path: &std::path::Path) -> anyhow::Result<Self> {
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("failed to open {path:?} for writing"))?;
        tracing::info!("Output file opened: {:?}", path);
        Ok(Self {
            file: tokio::io::BufWriter::new(file),
            path: path.to_path_buf(),
            bytes_written: 0,
        })
    }

    pub async fn write(&mut self, block: &[u8]) -> anyhow::Result<()> {
        self.file
            .write_all(block)
            .await
            .with_context(|| format!("failed to write to {:?}", self.path))?;
        self.file
            .flush()
            .await
            .with_context(|| format!("failed to flush {:?}", self.path))?;
        self.bytes_written += block.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub async fn close(mut self) -> anyhow::Result<()> {
        self.file
            .flush()
            .await
            .with_context(|| format!("failed to flush {:?}", self.path))?;
        tracing::info!(
            "Output file closed: {:?}, total bytes written: {}",
            self.path,
            self.bytes_written
        );
        Ok(())
    }
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
    async fn writer_reader_round_trip() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("units.bin");
        let payloads: [&[u8]; 3] = [b"Hi", b"", b"ABCDE"];
        let mut writer = UnitFileWriter::create(&path).await?;
        for payload in payloads {
            writer.write(&frame(payload)).await?;
        }
        assert_eq!(writer.bytes_written(), 6 + 4 + 9);
        writer.close().await?;

        let mut reader = UnitFileReader::open(&path).await?;
        for payload in payloads {
            let block = reader.read_next_frame().await?.expect("block present");
            assert_eq!(&block[..], &frame(payload)[..]);
        }
        assert!(reader.read_next_frame().await?.is_none());
        // stays at end of file on repeated calls
        assert!(reader.read_next_frame().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn empty_file_is_end_of_data() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("empty.bin");
        tokio::fs::write(&path, b"").await?;
        let mut reader = UnitFileReader::open(&path).await?;
        assert!(reader.read_next_frame().await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn truncated_header_is_an_error() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("short-header.bin");
        tokio::fs::write(&path, [0x00, 0x00, 0x01]).await?;
        let mut reader = UnitFileReader::open(&path).await?;
        assert!(reader.read_next_frame().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn truncated_payload_is_an_error() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let path = tmp_dir.path().join("short-payload.bin");
        tokio::fs::write(&path, [0x00, 0x00, 0x00, 0x05, b'A', b'B']).await?;
        let mut reader = UnitFileReader::open(&path).await?;
        assert!(reader.read_next_frame().await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn open_fails_for_missing_file() {
        let result = UnitFileReader::open(std::path::Path::new("/nonexistent/units.bin")).await;
        assert!(result.is_err());
    }
}
