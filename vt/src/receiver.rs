//! Receive loop: accepts one connection and feeds its bytes to the sink.

use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::instrument;

/// Accepts a single inbound connection and pumps it into the acceptor
/// until the peer closes.
///
/// Chunks of up to `read_buffer` bytes are handed to the sink in arrival
/// order. A clean end of stream terminates the loop successfully (after
/// draining any frames still queued in the sink); any other read error is
/// terminal - no retry, no reconnection. Exactly one connection is served
/// per call.
#[instrument(skip(listener, acceptor))]
pub async fn run_receiver(
    listener: &tokio::net::TcpListener,
    acceptor: &mut wire::acceptor::DataAcceptor,
    read_buffer: usize,
) -> anyhow::Result<()> {
    let (mut stream, peer) = listener
        .accept()
        .await
        .context("failed to accept connection")?;
    stream.set_nodelay(true).context("failed to set TCP_NODELAY")?;
    tracing::info!("Accepted connection from {}", peer);
    let mut chunk = vec![0u8; read_buffer];
    loop {
        let n = stream
            .read(&mut chunk)
            .await
            .context("failed to read from socket")?;
        if n == 0 {
            let drained = acceptor.drain().await?;
            if drained > 0 {
                tracing::debug!("drained {} queued data units after end of stream", drained);
            }
            if acceptor.pending_bytes() > 0 {
                tracing::warn!(
                    "discarding {} bytes of an incomplete trailing frame",
                    acceptor.pending_bytes()
                );
            }
            tracing::info!("Connection closed by peer");
            return Ok(());
        }
        acceptor.accept(&chunk[..n]).await?;
    }
}
