//! Room lifecycle and match orchestration.
//!
//! A room is an actor: one Tokio task owning one match between exactly
//! two players, fed by a command channel and a timer channel. The
//! [`RoomRegistry`] creates rooms when the matchmaker pairs two
//! waiters, resolves which actor a player command belongs to, and
//! reclaims rooms once both players have left.
//!
//! Terminal outcomes go to a [`StatsRecorder`], fire-and-forget,
//! strictly after the terminal broadcast.

mod error;
mod registry;
mod room;
mod stats;
mod status;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{LeaveOutcome, PlayerSender, RoomHandle, Seating};
pub use stats::{MatchRecord, MemoryStats, NoopStats, StatsRecorder};
pub use status::RoomStatus;
