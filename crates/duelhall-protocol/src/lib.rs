//! Wire protocol for Duelhall: identities, game taxonomy, client
//! commands, server events, and the JSON codec.
//!
//! Everything a client and the server exchange is defined here, so the
//! other crates share one vocabulary and never invent ad hoc payloads.
//!
//! # Key types
//!
//! - [`PlayerId`] / [`RoomId`] — newtype identities
//! - [`GameKind`] / [`Mode`] — which minigame, which time-pressure tier
//! - [`ClientCommand`] — everything a client may send
//! - [`ServerEvent`] — everything the server may push
//! - [`encode`] / [`decode`] — JSON framing helpers

mod codec;
mod error;
mod ids;
mod messages;
mod types;

pub use codec::{decode, encode};
pub use error::ProtocolError;
pub use ids::{PlayerId, RoomId, Seat};
pub use messages::{
    ClientCommand, GameSnapshot, RejectReason, RoundDetail, SeatedPlayer,
    ServerEvent,
};
pub use types::{Choice, GameKind, Mode, Outcome, PlayerAction};
