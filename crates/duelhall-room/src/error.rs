//! Error types for the room layer.
//!
//! These cover routing only: finding the room and the seat. Everything
//! about the game itself (wrong turn, illegal position, room already
//! finished) is answered by the room actor as a [`Rejected`] event on
//! the issuing player's channel, never as an error to the caller.
//!
//! [`Rejected`]: duelhall_protocol::ServerEvent::Rejected

use duelhall_protocol::{PlayerId, RoomId};

/// Errors that can occur while routing a command to a room.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (never created, or already reclaimed).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The player is not seated in this room.
    #[error("player {0} not seated in room {1}")]
    NotSeated(PlayerId, RoomId),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
