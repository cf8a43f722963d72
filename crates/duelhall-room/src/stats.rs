//! Outcome reporting seam.
//!
//! Rooms report terminal outcomes to an external stats collaborator.
//! The call is fire-and-forget: it is spawned strictly after the
//! terminal broadcast is committed, once per seated player, and its
//! latency or failure can never delay or corrupt the room itself.

use std::future::Future;
use std::sync::{Arc, Mutex};

use duelhall_protocol::{GameKind, Mode, Outcome, PlayerId, RoomId};

/// One player's result in one finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub room: RoomId,
    pub game: GameKind,
    pub mode: Mode,
    pub player: PlayerId,
    pub opponent: PlayerId,
    /// Persistent account, when the player logged in with one.
    pub account_id: Option<u64>,
    pub outcome: Outcome,
    /// `false` for abandonment resolutions: the win/loss is recorded
    /// but awards no experience.
    pub rated: bool,
}

/// Where terminal outcomes go. Implementations must tolerate being
/// called from a spawned task; errors are theirs to log, not return.
pub trait StatsRecorder: Clone + Send + Sync + 'static {
    fn record(&self, record: MatchRecord) -> impl Future<Output = ()> + Send;
}

/// Discards every record. The default when no backend is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStats;

impl StatsRecorder for NoopStats {
    async fn record(&self, record: MatchRecord) {
        tracing::debug!(room = %record.room, player = %record.player, outcome = ?record.outcome, "outcome dropped (no stats backend)");
    }
}

/// Collects records in memory. Test backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    records: Arc<Mutex<Vec<MatchRecord>>>,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MatchRecord> {
        self.records.lock().expect("stats lock").clone()
    }
}

impl StatsRecorder for MemoryStats {
    async fn record(&self, record: MatchRecord) {
        self.records.lock().expect("stats lock").push(record);
    }
}
