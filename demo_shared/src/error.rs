//! Decode error taxonomy.

use std::fmt;

/// Errors produced while decoding an inbound frame.
///
/// Neither variant is fatal to the client: the dispatch loop drops the
/// offending frame and keeps going. An unknown `messageType` is not an
/// error at all and never reaches this type.
#[derive(Debug)]
pub enum ProtocolError {
    /// The frame is not JSON or carries no string `messageType` field.
    BadEnvelope(serde_json::Error),
    /// A recognized message type whose payload does not match its schema.
    MalformedPayload {
        message_type: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::BadEnvelope(_) => {
                write!(f, "frame has no decodable messageType envelope")
            }
            ProtocolError::MalformedPayload { message_type, .. } => {
                write!(f, "malformed payload for message type {message_type}")
            }
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::BadEnvelope(e) => Some(e),
            ProtocolError::MalformedPayload { source, .. } => Some(source),
        }
    }
}
