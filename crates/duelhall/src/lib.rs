//! # Duelhall
//!
//! Real-time match server for two-player minigames: a websocket
//! gateway in front of a FIFO matchmaker, per-room actor tasks, a
//! keyed deadline scheduler, and six pure game engines.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use duelhall::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), DuelhallError> {
//!     let server = DuelhallServerBuilder::new()
//!         .bind("0.0.0.0:9000")
//!         .build(NoopStats)
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::DuelhallError;
pub use server::{DuelhallServer, DuelhallServerBuilder};

pub use duelhall_engine as engine;
pub use duelhall_matchmaker as matchmaker;
pub use duelhall_protocol as protocol;
pub use duelhall_room as room;
pub use duelhall_timer as timer;

pub mod prelude {
    pub use crate::{DuelhallError, DuelhallServer, DuelhallServerBuilder};
    pub use duelhall_protocol::{
        ClientCommand, GameKind, Mode, PlayerAction, PlayerId, RoomId, ServerEvent,
    };
    pub use duelhall_room::{MatchRecord, NoopStats, StatsRecorder};
    pub use duelhall_timer::TimerProfile;
}
