//! Client session.
//!
//! Ties the sync core together: the inbound queue, dispatcher, and registry
//! on the tick side; outbound announcements on the send side. The embedding
//! application owns the loop and calls [`ClientSession::tick`] once per
//! frame.

use anyhow::Context;
use demo_shared::config::ClientConfig;
use demo_shared::protocol::{Player, PlayerId};
use tracing::{debug, info};

use crate::dispatch;
use crate::outbound::OutboundSync;
use crate::presentation::Presentation;
use crate::queue::InboundQueue;
use crate::registry::PlayerRegistry;
use crate::transport::{TcpTextTransport, Transport};

/// One connected client: local player plus the mirror of everyone else.
pub struct ClientSession<T: Transport, P: Presentation> {
    local: Player,
    queue: InboundQueue,
    outbound: OutboundSync<T>,
    registry: PlayerRegistry<P>,
}

impl<P: Presentation> ClientSession<TcpTextTransport, P> {
    /// Connects to the configured server and announces the local player.
    pub async fn connect(cfg: &ClientConfig, presentation: P) -> anyhow::Result<Self> {
        let queue = InboundQueue::new();
        let transport = TcpTextTransport::connect(&cfg.server_addr, queue.clone())
            .await
            .context("connect transport")?;
        let mut session = Self::new(transport, presentation, queue);
        session.start().await?;
        Ok(session)
    }
}

impl<T: Transport, P: Presentation> ClientSession<T, P> {
    /// Builds a session over an already-connected transport. `queue` must be
    /// the handle the transport's arrival callback feeds.
    pub fn new(transport: T, presentation: P, queue: InboundQueue) -> Self {
        let id = PlayerId::random();
        let position = presentation.local_position();
        info!(id = %id, "Created local player");
        Self {
            local: Player {
                id: id.clone(),
                position,
            },
            queue,
            outbound: OutboundSync::new(transport),
            registry: PlayerRegistry::new(id, presentation),
        }
    }

    /// Announces the local player and requests the initial snapshot.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.outbound.announce_enter(&self.local).await?;
        self.outbound.request_game_state().await?;
        Ok(())
    }

    /// One tick: apply queued server state, then relay local movement.
    pub async fn tick(&mut self) -> anyhow::Result<()> {
        let applied = dispatch::drain_and_dispatch(&self.queue, &mut self.registry);
        if applied > 0 {
            debug!(frames = applied, "Applied inbound frames");
        }

        let position = self.registry.presentation().local_position();
        if position != self.local.position {
            self.local.position = position;
            self.outbound.announce_update(&self.local).await?;
        }
        Ok(())
    }

    /// Tears the session down: exit announcement (best effort), tracked
    /// entities dropped, transport closed. Frames still arriving are
    /// discarded along with the queue.
    pub async fn close(&mut self, reason: &str) -> anyhow::Result<()> {
        if let Err(e) = self.outbound.announce_exit(&self.local).await {
            debug!(error = %e, "Exit announcement failed");
        }
        self.registry.clear();
        self.outbound.transport_mut().close(reason).await?;
        info!(reason, "Session closed");
        Ok(())
    }

    pub fn local_player(&self) -> &Player {
        &self.local
    }

    pub fn registry(&self) -> &PlayerRegistry<P> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PlayerRegistry<P> {
        &mut self.registry
    }
}
