//! Transport seam and the provided TCP text transport.
//!
//! Envelopes are JSON text, one per line. The read half runs on its own
//! task and only ever touches the inbound queue; everything else stays on
//! the tick context.

use std::fmt;
use std::io;
use std::net::SocketAddr;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::queue::InboundQueue;

/// Errors surfaced by a transport.
#[derive(Debug)]
pub enum TransportError {
    /// Send attempted after the connection was closed.
    Closed,
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Closed => write!(f, "transport closed"),
            TransportError::Io(e) => write!(f, "transport io error: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Closed => None,
            TransportError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        TransportError::Io(e)
    }
}

/// Message-based connection to the game server.
#[async_trait]
pub trait Transport: Send {
    /// Transmits one encoded envelope. No acknowledgement is awaited.
    async fn send(&mut self, text: &str) -> Result<(), TransportError>;
    /// Closes the connection. The arrival callback stops before the socket
    /// goes away; sends afterwards fail with [`TransportError::Closed`].
    async fn close(&mut self, reason: &str) -> Result<(), TransportError>;
}

/// TCP transport carrying one JSON envelope per line.
pub struct TcpTextTransport {
    writer: Option<OwnedWriteHalf>,
    reader_task: JoinHandle<()>,
}

impl TcpTextTransport {
    /// Connects to `addr` and starts a reader task that feeds every
    /// received frame into `queue`.
    pub async fn connect(addr: &str, queue: InboundQueue) -> anyhow::Result<Self> {
        let server_addr: SocketAddr = addr.parse().context("parse server addr")?;
        let stream = TcpStream::connect(server_addr)
            .await
            .context("tcp connect")?;
        info!(server = %server_addr, "Connected to server");

        let (read_half, writer) = stream.into_split();
        let reader_task = tokio::spawn(read_frames(read_half, queue));

        Ok(Self {
            writer: Some(writer),
            reader_task,
        })
    }
}

async fn read_frames(read_half: OwnedReadHalf, queue: InboundQueue) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                debug!(len = line.len(), "Frame received");
                queue.enqueue(line);
            }
            Ok(None) => {
                info!("Server closed the connection");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Read error, stopping receive loop");
                break;
            }
        }
    }
}

#[async_trait]
impl Transport for TcpTextTransport {
    async fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let writer = self.writer.as_mut().ok_or(TransportError::Closed)?;
        writer.write_all(text.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        Ok(())
    }

    async fn close(&mut self, reason: &str) -> Result<(), TransportError> {
        self.reader_task.abort();
        if let Some(mut writer) = self.writer.take() {
            info!(reason, "Closing connection");
            writer.shutdown().await?;
        }
        Ok(())
    }
}

impl Drop for TcpTextTransport {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}
