//! Local player announcements.
//!
//! Constructs and transmits the local player's envelopes. No rate limiting
//! happens here: the session announces an update only when the local
//! position actually changed, one envelope per discrete move.

use anyhow::Context;
use demo_shared::protocol::{self, ClientMsg, Player};
use tracing::debug;

use crate::transport::Transport;

/// Sends the local player's lifecycle and movement envelopes.
pub struct OutboundSync<T: Transport> {
    transport: T,
}

impl<T: Transport> OutboundSync<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Announces the local player. Sent exactly once, at session start,
    /// before any update.
    pub async fn announce_enter(&mut self, player: &Player) -> anyhow::Result<()> {
        self.send(&ClientMsg::PlayerEnter {
            player: player.clone(),
        })
        .await
        .context("announce enter")
    }

    /// Relays one discrete local move.
    pub async fn announce_update(&mut self, player: &Player) -> anyhow::Result<()> {
        self.send(&ClientMsg::PlayerUpdate {
            player: player.clone(),
        })
        .await
        .context("announce update")
    }

    /// Notifies peers that the local player is leaving.
    pub async fn announce_exit(&mut self, player: &Player) -> anyhow::Result<()> {
        self.send(&ClientMsg::PlayerExit {
            player: player.clone(),
        })
        .await
        .context("announce exit")
    }

    /// Requests a full-state snapshot for initial catch-up.
    pub async fn request_game_state(&mut self) -> anyhow::Result<()> {
        self.send(&ClientMsg::GetGameState)
            .await
            .context("request game state")
    }

    async fn send(&mut self, msg: &ClientMsg) -> anyhow::Result<()> {
        let text = protocol::encode_client_msg(msg).context("serialize msg")?;
        debug!(len = text.len(), "Sending envelope");
        self.transport.send(&text).await?;
        Ok(())
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use demo_shared::math::Vec2;
    use demo_shared::protocol::{decode_client_msg, Decoded, PlayerId};

    use crate::transport::TransportError;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Vec<String>,
        closed: bool,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&mut self, text: &str) -> Result<(), TransportError> {
            if self.closed {
                return Err(TransportError::Closed);
            }
            self.sent.push(text.to_string());
            Ok(())
        }

        async fn close(&mut self, _reason: &str) -> Result<(), TransportError> {
            self.closed = true;
            Ok(())
        }
    }

    fn local_player() -> Player {
        Player {
            id: PlayerId("local".to_string()),
            position: Vec2::new(1.0, 2.0),
        }
    }

    #[tokio::test]
    async fn announcements_encode_the_expected_variants() -> anyhow::Result<()> {
        let mut outbound = OutboundSync::new(RecordingTransport::default());
        let player = local_player();

        outbound.announce_enter(&player).await?;
        outbound.request_game_state().await?;
        outbound.announce_update(&player).await?;
        outbound.announce_exit(&player).await?;

        let sent = &outbound.transport_mut().sent;
        assert_eq!(sent.len(), 4);

        let expected = [
            ClientMsg::PlayerEnter {
                player: player.clone(),
            },
            ClientMsg::GetGameState,
            ClientMsg::PlayerUpdate {
                player: player.clone(),
            },
            ClientMsg::PlayerExit { player },
        ];
        for (raw, want) in sent.iter().zip(expected) {
            assert_eq!(decode_client_msg(raw)?, Decoded::Msg(want));
        }
        Ok(())
    }

    #[tokio::test]
    async fn closed_transport_errors_surface_to_the_caller() -> anyhow::Result<()> {
        let mut outbound = OutboundSync::new(RecordingTransport::default());
        outbound.transport_mut().close("bye").await?;

        let err = outbound
            .announce_update(&local_player())
            .await
            .expect_err("send on a closed transport must fail");
        assert!(err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<TransportError>(),
                Some(TransportError::Closed)
            )
        }));
        Ok(())
    }
}
