//! Send loop: paces validated frames onto the TCP connection.

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

/// What the send loop accomplished before the source ran dry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendSummary {
    pub units_sent: u64,
    pub bytes_sent: u64,
}

impl std::fmt::Display for SendSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sent {} data units ({} bytes)",
            self.units_sent, self.bytes_sent
        )
    }
}

/// Resolves the destination and opens the TCP connection.
#[instrument]
pub async fn connect(host: &str, port: u16) -> anyhow::Result<tokio::net::TcpStream> {
    let stream = tokio::net::TcpStream::connect((host, port))
        .await
        .with_context(|| format!("failed to connect to {host}:{port}"))?;
    stream.set_nodelay(true).context("failed to set TCP_NODELAY")?;
    tracing::info!("Connected to {}:{}", host, port);
    Ok(stream)
}

/// Drives the send loop to completion.
///
/// Pulls one validated frame at a time from the provider, writes it in
/// full, then waits the fixed inter-unit delay before the next pull.
/// The delay paces the stream; it is not a correctness requirement and a
/// receiver must stay correct whatever the spacing. Source exhaustion ends
/// the transport cleanly; any read, validation or write failure is
/// terminal - nothing is retried.
#[instrument(skip(stream, provider))]
pub async fn run_sender(
    stream: &mut tokio::net::TcpStream,
    provider: &mut wire::provider::DataProvider,
    delay: std::time::Duration,
) -> anyhow::Result<SendSummary> {
    let mut summary = SendSummary::default();
    while let Some(frame) = provider.next_frame().await? {
        stream
            .write_all(&frame)
            .await
            .context("failed to write data unit to socket")?;
        summary.units_sent += 1;
        summary.bytes_sent += frame.len() as u64;
        tracing::debug!("sent data unit {} ({} bytes)", summary.units_sent, frame.len());
        tokio::time::sleep(delay).await;
    }
    tracing::info!("Transport complete - no more data units available");
    Ok(summary)
}
