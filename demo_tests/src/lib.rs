//! Support code for the integration tests.
//!
//! [`StubServer`] stands in for the game server: it accepts one connection,
//! reads the client's announcements, and pushes the same envelopes the real
//! server broadcasts.

use std::time::Duration;

use anyhow::Context;
use demo_client::client::ClientSession;
use demo_client::presentation::{HeadlessScene, Presentation};
use demo_client::queue::InboundQueue;
use demo_client::transport::{TcpTextTransport, Transport};
use demo_shared::protocol::{self, ClientMsg, Decoded, ServerMsg};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Server side of one accepted client connection.
pub struct StubServer {
    pub lines: Lines<BufReader<OwnedReadHalf>>,
    pub writer: OwnedWriteHalf,
}

impl StubServer {
    /// Pushes one server envelope to the client.
    pub async fn push(&mut self, msg: &ServerMsg) -> anyhow::Result<()> {
        let text = protocol::encode_server_msg(msg)?;
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    /// Pushes a raw line, bypassing the codec.
    pub async fn push_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    /// Reads and decodes the next frame the client sent.
    pub async fn next_client_msg(&mut self) -> anyhow::Result<ClientMsg> {
        let raw = self
            .lines
            .next_line()
            .await?
            .context("client hung up early")?;
        match protocol::decode_client_msg(&raw)? {
            Decoded::Msg(msg) => Ok(msg),
            Decoded::Unknown(ty) => anyhow::bail!("stub got unknown client message {ty}"),
        }
    }
}

/// Binds a stub server on an ephemeral port and connects a fresh session.
pub async fn connect_pair() -> anyhow::Result<(
    StubServer,
    ClientSession<TcpTextTransport, HeadlessScene>,
)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let queue = InboundQueue::new();
    let transport = TcpTextTransport::connect(&addr.to_string(), queue.clone()).await?;
    let session = ClientSession::new(transport, HeadlessScene::new(), queue);

    let (stream, _) = listener.accept().await?;
    let (read_half, writer) = stream.into_split();
    let server = StubServer {
        lines: BufReader::new(read_half).lines(),
        writer,
    };
    Ok((server, session))
}

/// Ticks until `cond` holds, or gives up after ~500ms.
pub async fn tick_until<T, P, F>(
    session: &mut ClientSession<T, P>,
    mut cond: F,
) -> anyhow::Result<bool>
where
    T: Transport,
    P: Presentation,
    F: FnMut(&ClientSession<T, P>) -> bool,
{
    for _ in 0..50 {
        session.tick().await?;
        if cond(session) {
            return Ok(true);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(false)
}
