//! Inbound message routing.
//!
//! Decodes raw frames and applies them to the player registry. Unknown
//! message types are skipped for forward compatibility; frames that fail to
//! decode are dropped without stopping the frames behind them.

use demo_shared::error::ProtocolError;
use demo_shared::protocol::{self, Decoded, ServerMsg};
use tracing::{debug, warn};

use crate::presentation::Presentation;
use crate::queue::InboundQueue;
use crate::registry::PlayerRegistry;

/// Decodes one raw frame and applies it to the registry.
pub fn dispatch<P: Presentation>(
    raw: &str,
    registry: &mut PlayerRegistry<P>,
) -> Result<(), ProtocolError> {
    match protocol::decode_server_msg(raw)? {
        Decoded::Msg(ServerMsg::PlayerEnter { player }) => registry.on_enter(player),
        Decoded::Msg(ServerMsg::PlayerUpdate { player }) => registry.on_update(player),
        Decoded::Msg(ServerMsg::PlayerExit { player }) => registry.on_exit(&player.id),
        Decoded::Msg(ServerMsg::GameState { game_state }) => registry.on_game_state(game_state),
        Decoded::Unknown(message_type) => {
            debug!(message_type, "Ignoring unknown message type");
        }
    }
    Ok(())
}

/// Drains every queued frame and applies each in arrival order.
///
/// This is the per-tick drain point. A frame that fails to decode is logged
/// and dropped; the remaining frames still run. Returns the number of
/// frames taken off the queue.
pub fn drain_and_dispatch<P: Presentation>(
    queue: &InboundQueue,
    registry: &mut PlayerRegistry<P>,
) -> usize {
    let frames = queue.drain_all();
    let count = frames.len();
    for raw in frames {
        if let Err(e) = dispatch(&raw, registry) {
            warn!(error = %e, "Dropping undecodable frame");
        }
    }
    count
}
