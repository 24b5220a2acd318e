//! Receive-side pipeline: raw socket bytes in, persisted data units plus
//! timestamp entries out.

use crate::codec;
use crate::unitfile;

/// Turns arriving raw bytes into persisted units and tracks counters.
///
/// Owns its codec state and counters exclusively - the receive loop is the
/// only caller, so nothing here needs synchronization.
#[derive(Debug)]
pub struct DataAcceptor {
    writer: unitfile::UnitFileWriter,
    timestamps: common::tslog::TimestampLog,
    codec: codec::FrameCodec,
    units_received: u64,
    bytes_received: u64,
}

impl DataAcceptor {
    pub fn new(writer: unitfile::UnitFileWriter, timestamps: common::tslog::TimestampLog) -> Self {
        Self {
            writer,
            timestamps,
            codec: codec::FrameCodec::new(),
            units_received: 0,
            bytes_received: 0,
        }
    }

    /// Feeds one chunk of raw socket bytes through the codec.
    ///
    /// Completing a frame persists the unit in canonical wire form and
    /// appends a timestamp entry. An incomplete frame is not an error -
    /// the bytes stay buffered and the call returns quietly. At most one
    /// unit is surfaced per call; frames queued behind it drain on
    /// subsequent calls (or via [`drain`](Self::drain)).
    pub async fn accept(&mut self, raw: &[u8]) -> anyhow::Result<()> {
        self.bytes_received += raw.len() as u64;
        let Some(unit) = self.codec.decode(raw) else {
            return Ok(());
        };
        self.persist(unit).await
    }

    /// Flushes complete frames still sitting in the pending buffer.
    ///
    /// Since [`accept`](Self::accept) surfaces at most one unit per call,
    /// a chunk carrying several frames leaves the rest queued; the receive
    /// loop calls this once the peer closes so every unit that arrived in
    /// full gets persisted. Returns the number of units flushed.
    pub async fn drain(&mut self) -> anyhow::Result<usize> {
        let mut drained = 0;
        while let Some(unit) = self.codec.decode(&[]) {
            self.persist(unit).await?;
            drained += 1;
        }
        Ok(drained)
    }

    async fn persist(&mut self, unit: codec::DataUnit) -> anyhow::Result<()> {
        // re-encode so what lands on disk is the canonical wire form
        let frame = self.codec.encode(&unit);
        self.writer.write(&frame).await?;
        self.timestamps.record(unit.length, unit.frame_size()).await?;
        self.units_received += 1;
        tracing::debug!(
            "persisted data unit {} ({} bytes on the wire)",
            self.units_received,
            frame.len()
        );
        Ok(())
    }

    pub fn units_received(&self) -> u64 {
        self.units_received
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Bytes buffered but not yet part of a complete unit.
    pub fn pending_bytes(&self) -> usize {
        self.codec.pending_len()
    }

    /// Closes the output file, logging the total written.
    pub async fn finish(self) -> anyhow::Result<()> {
        self.writer.close().await
    }
}
