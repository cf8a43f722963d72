//! Room registry: creates rooms, tracks which player sits where, and
//! resolves which actor a command belongs to.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use duelhall_protocol::{GameKind, Mode, PlayerId, RoomId};
use duelhall_timer::{DeadlineScheduler, TimerProfile};

use crate::room::spawn_room;
use crate::{LeaveOutcome, RoomError, RoomHandle, Seating, StatsRecorder};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns every live room in the process.
///
/// The registry is the single writer of the room and player maps; the
/// server serializes access to it. Per-room state lives in the room
/// actors, which callers talk to through handles resolved here — the
/// registry itself never awaits a room.
pub struct RoomRegistry<S: StatsRecorder> {
    rooms: HashMap<RoomId, RoomHandle>,
    /// A player sits in at most one room (key invariant).
    player_rooms: HashMap<PlayerId, RoomId>,
    scheduler: DeadlineScheduler,
    profile: TimerProfile,
    stats: S,
}

impl<S: StatsRecorder> RoomRegistry<S> {
    pub fn new(stats: S) -> Self {
        Self::with_profile(stats, TimerProfile::default())
    }

    pub fn with_profile(stats: S, profile: TimerProfile) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            scheduler: DeadlineScheduler::new(),
            profile,
            stats,
        }
    }

    /// Creates a room for a freshly paired match and starts it. The
    /// first seating (the longer-waiting player) acts first.
    ///
    /// Callers must not seat a player who is already in a room; the
    /// matchmaker and gateway uphold that between them.
    pub fn create_room(
        &mut self,
        game: GameKind,
        mode: Mode,
        first: Seating,
        second: Seating,
    ) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        debug_assert!(!self.player_rooms.contains_key(&first.id));
        debug_assert!(!self.player_rooms.contains_key(&second.id));

        self.player_rooms.insert(first.id, room_id);
        self.player_rooms.insert(second.id, room_id);
        let handle = spawn_room(
            room_id,
            game,
            mode,
            first,
            second,
            self.scheduler.clone(),
            self.profile.clone(),
            self.stats.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, ?game, ?mode, "room created");
        room_id
    }

    /// Resolves the handle for a command aimed at `room_id`, checking
    /// the seat index first. Returns a clone so callers can await the
    /// room without borrowing the registry: the server resolves the
    /// handle under its gateway lock, drops the lock, and only then
    /// runs the room command, so one backed-up room cannot stall
    /// dispatch for every other connection.
    pub fn handle_for(&self, player: PlayerId, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        match self.player_rooms.get(&player) {
            Some(current) if *current == room_id => self
                .rooms
                .get(&room_id)
                .cloned()
                .ok_or(RoomError::NotFound(room_id)),
            Some(_) | None => Err(RoomError::NotSeated(player, room_id)),
        }
    }

    /// Books a completed leave: the player is unseated and, once the
    /// last player is out, the room is reclaimed (the actor exits on
    /// its own). The outcome comes from [`RoomHandle::leave`] on a
    /// handle resolved via [`Self::handle_for`].
    pub fn settle_leave(&mut self, player: PlayerId, room_id: RoomId, outcome: LeaveOutcome) {
        self.player_rooms.remove(&player);
        if outcome.room_empty {
            self.rooms.remove(&room_id);
            tracing::info!(%room_id, "room reclaimed");
        }
    }

    /// Returns the room a player currently sits in, if any.
    pub fn player_room(&self, player: PlayerId) -> Option<RoomId> {
        self.player_rooms.get(&player).copied()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
