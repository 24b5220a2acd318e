//! Plain-text arrival log: one timestamped line per received data unit.

use anyhow::Context;
use tokio::io::AsyncWriteExt;

/// Appends one line per completed data unit, flushing per call so the log
/// survives a hard stop of the process.
#[derive(Debug)]
pub struct TimestampLog {
    file: tokio::io::BufWriter<tokio::fs::File>,
}

impl TimestampLog {
    /// Creates (or truncates) the log file.
    pub async fn create(path: &std::path::Path) -> anyhow::Result<Self> {
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("failed to open timestamp log {path:?} for writing"))?;
        tracing::debug!("Timestamp log opened: {:?}", path);
        Ok(Self {
            file: tokio::io::BufWriter::new(file),
        })
    }

    /// Records the arrival of one data unit.
    ///
    /// The entry carries the unit's payload length and its total size on
    /// the wire, stamped with the local wall-clock time.
    pub async fn record(&mut self, payload_length: u32, frame_size: usize) -> anyhow::Result<()> {
        let now = chrono::Local::now();
        let line = format!(
            "{} - data unit: {frame_size} bytes (length: {payload_length})\n",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
        );
        self.file
            .write_all(line.as_bytes())
            .await
            .context("failed to write to timestamp log")?;
        self.file
            .flush()
            .await
            .context("failed to flush timestamp log")?;
        Ok(())
    }
}
