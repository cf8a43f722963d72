//! Unified error type for the Duelhall server.

use duelhall_protocol::ProtocolError;
use duelhall_room::RoomError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From`
/// impls, so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum DuelhallError {
    /// A socket-level error (bind, accept, send, recv).
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// A WebSocket-level error (handshake, framing).
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, not seated, bad status).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let top: DuelhallError = err.into();
        assert!(matches!(top, DuelhallError::Protocol(_)));
        assert!(top.to_string().contains("bad"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(duelhall_protocol::RoomId(1));
        let top: DuelhallError = err.into();
        assert!(matches!(top, DuelhallError::Room(_)));
    }
}
