//! Wire protocol.
//!
//! Goals:
//! - Textual JSON envelopes, one per transport frame, discriminated by a
//!   `messageType` string.
//! - Two-stage decoding: envelope discriminant first, typed payload second,
//!   so an unrecognized type can be skipped without an error.
//! - Keep serialization explicit and versionable.

use std::collections::HashMap;
use std::fmt;

use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::{error::ProtocolError, math::Vec2};

/// Client -> server message type literals.
pub const CLIENT_MSG_PLAYER_ENTER: &str = "CLIENT_MESSAGE_TYPE_PLAYER_ENTER";
pub const CLIENT_MSG_PLAYER_UPDATE: &str = "CLIENT_MESSAGE_TYPE_PLAYER_UPDATE";
pub const CLIENT_MSG_PLAYER_EXIT: &str = "CLIENT_MESSAGE_TYPE_PLAYER_EXIT";
pub const CLIENT_MSG_GET_GAME_STATE: &str = "CLIENT_MESSAGE_TYPE_GET_GAME_STATE";

/// Server -> client message type literals.
pub const SERVER_MSG_PLAYER_ENTER: &str = "SERVER_MESSAGE_TYPE_PLAYER_ENTER";
pub const SERVER_MSG_PLAYER_EXIT: &str = "SERVER_MESSAGE_TYPE_PLAYER_EXIT";
pub const SERVER_MSG_PLAYER_UPDATE: &str = "SERVER_MESSAGE_TYPE_PLAYER_UPDATE";
pub const SERVER_MSG_GAME_STATE: &str = "SERVER_MESSAGE_TYPE_GAME_STATE";

const KNOWN_CLIENT_TYPES: [&str; 4] = [
    CLIENT_MSG_PLAYER_ENTER,
    CLIENT_MSG_PLAYER_UPDATE,
    CLIENT_MSG_PLAYER_EXIT,
    CLIENT_MSG_GET_GAME_STATE,
];

const KNOWN_SERVER_TYPES: [&str; 4] = [
    SERVER_MSG_PLAYER_ENTER,
    SERVER_MSG_PLAYER_EXIT,
    SERVER_MSG_PLAYER_UPDATE,
    SERVER_MSG_GAME_STATE,
];

/// Identifies a player. Immutable for the lifetime of the player entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Generates a fresh random id for the local player at session start.
    pub fn random() -> Self {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        PlayerId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub position: Vec2,
}

/// Full-state snapshot, used only for initial catch-up after joining.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(rename = "connectionIds")]
    pub connection_ids: Vec<PlayerId>,
    #[serde(rename = "playerIdToPlayer")]
    pub player_id_to_player: HashMap<PlayerId, Player>,
}

impl GameState {
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.player_id_to_player.values()
    }
}

/// Messages this client sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType")]
pub enum ClientMsg {
    #[serde(rename = "CLIENT_MESSAGE_TYPE_PLAYER_ENTER")]
    PlayerEnter { player: Player },
    #[serde(rename = "CLIENT_MESSAGE_TYPE_PLAYER_UPDATE")]
    PlayerUpdate { player: Player },
    #[serde(rename = "CLIENT_MESSAGE_TYPE_PLAYER_EXIT")]
    PlayerExit { player: Player },
    #[serde(rename = "CLIENT_MESSAGE_TYPE_GET_GAME_STATE")]
    GetGameState,
}

/// Messages the server pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType")]
pub enum ServerMsg {
    #[serde(rename = "SERVER_MESSAGE_TYPE_PLAYER_ENTER")]
    PlayerEnter { player: Player },
    /// The id is authoritative; the carried position is ignored.
    #[serde(rename = "SERVER_MESSAGE_TYPE_PLAYER_EXIT")]
    PlayerExit { player: Player },
    #[serde(rename = "SERVER_MESSAGE_TYPE_PLAYER_UPDATE")]
    PlayerUpdate { player: Player },
    #[serde(rename = "SERVER_MESSAGE_TYPE_GAME_STATE")]
    GameState {
        #[serde(rename = "gameState")]
        game_state: GameState,
    },
}

/// Result of decoding an inbound frame.
///
/// `Unknown` carries the unrecognized `messageType` so the caller can log
/// it; it is a tolerated condition, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<M> {
    Msg(M),
    Unknown(String),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "messageType")]
    message_type: String,
}

/// Extracts the `messageType` discriminant without touching the payload.
pub fn decode_message_type(raw: &str) -> Result<String, ProtocolError> {
    let env: Envelope = serde_json::from_str(raw).map_err(ProtocolError::BadEnvelope)?;
    Ok(env.message_type)
}

pub fn encode_client_msg(msg: &ClientMsg) -> serde_json::Result<String> {
    serde_json::to_string(msg)
}

pub fn encode_server_msg(msg: &ServerMsg) -> serde_json::Result<String> {
    serde_json::to_string(msg)
}

pub fn decode_client_msg(raw: &str) -> Result<Decoded<ClientMsg>, ProtocolError> {
    let message_type = decode_message_type(raw)?;
    if !KNOWN_CLIENT_TYPES.contains(&message_type.as_str()) {
        return Ok(Decoded::Unknown(message_type));
    }
    serde_json::from_str(raw)
        .map(Decoded::Msg)
        .map_err(|source| ProtocolError::MalformedPayload {
            message_type,
            source,
        })
}

pub fn decode_server_msg(raw: &str) -> Result<Decoded<ServerMsg>, ProtocolError> {
    let message_type = decode_message_type(raw)?;
    if !KNOWN_SERVER_TYPES.contains(&message_type.as_str()) {
        return Ok(Decoded::Unknown(message_type));
    }
    serde_json::from_str(raw)
        .map(Decoded::Msg)
        .map_err(|source| ProtocolError::MalformedPayload {
            message_type,
            source,
        })
}
