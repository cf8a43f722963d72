//! Per-room deadline scheduling.
//!
//! A room arms at most one timer per [`TimerClass`]; arming again
//! replaces the previous deadline, and cancelling an absent or
//! already-fired timer is a no-op. A fired timer delivers exactly one
//! [`TimerFired`] through the channel the room provided — never after
//! a cancel that was issued before the fire.
//!
//! # Why keyed scheduling
//!
//! Deadlines are keyed by `(RoomId, TimerClass)` and carry a
//! generation number instead of capturing room state in a callback. A
//! fired event re-enters the room's own command loop, where the room
//! re-resolves its current state; a stale generation (the timer lost
//! the race against a move that re-armed or finished the room) is
//! simply ignored there. The armed-slot map is guarded by a sync mutex
//! that both the firing task and `cancel` must take, so for any given
//! deadline exactly one of "deliver" and "cancel" wins.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use duelhall_protocol::{Mode, RoomId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Which deadline a room armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerClass {
    /// Turn clock for turn-based games.
    Turn,
    /// Round window for round-based games (arm delay, go window,
    /// choice window, tap window, inter-round gap).
    Round,
}

/// Delivered to the room's timer channel when a deadline elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub room: RoomId,
    pub class: TimerClass,
    /// Generation returned by the matching [`DeadlineScheduler::arm`].
    pub generation: u64,
}

/// Channel end the scheduler delivers fires into. Unbounded so the
/// firing task never blocks inside the slot lock.
pub type TimerSender = mpsc::UnboundedSender<TimerFired>;

struct ArmedSlot {
    generation: u64,
    /// Set once the sleep task is spawned. A replaced slot with no
    /// handle yet is fine: the orphaned task sees a stale generation
    /// and exits without delivering.
    handle: Option<JoinHandle<()>>,
}

/// Schedules one-shot deadlines for all rooms in the process.
///
/// Cheap to clone; clones share the same slot table.
#[derive(Clone)]
pub struct DeadlineScheduler {
    slots: Arc<Mutex<HashMap<(RoomId, TimerClass), ArmedSlot>>>,
    next_generation: Arc<AtomicU64>,
}

impl DeadlineScheduler {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            next_generation: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Arms (or replaces) the deadline for `(room, class)`. Returns
    /// the generation the eventual [`TimerFired`] will carry.
    pub fn arm(
        &self,
        room: RoomId,
        class: TimerClass,
        duration: Duration,
        sender: TimerSender,
    ) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        // Register the slot before spawning so the sleep task always
        // finds its own entry, however fast it runs.
        let replaced = self.slots.lock().expect("timer slot lock").insert(
            (room, class),
            ArmedSlot {
                generation,
                handle: None,
            },
        );
        if let Some(slot) = replaced {
            if let Some(handle) = slot.handle {
                handle.abort();
            }
            tracing::trace!(%room, ?class, "replaced armed timer");
        }

        let slots = Arc::clone(&self.slots);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            // Fire-vs-cancel decided atomically under the slot lock.
            let won = {
                let mut slots = slots.lock().expect("timer slot lock");
                match slots.get(&(room, class)) {
                    Some(slot) if slot.generation == generation => {
                        slots.remove(&(room, class));
                        true
                    }
                    _ => false,
                }
            };
            if won {
                let _ = sender.send(TimerFired {
                    room,
                    class,
                    generation,
                });
            }
        });

        let mut slots = self.slots.lock().expect("timer slot lock");
        if let Some(slot) = slots.get_mut(&(room, class)) {
            if slot.generation == generation {
                slot.handle = Some(handle);
            }
        }

        generation
    }

    /// Prevents a pending fire for `(room, class)`. No-op when the
    /// timer is absent or already fired.
    pub fn cancel(&self, room: RoomId, class: TimerClass) {
        let removed = self.slots.lock().expect("timer slot lock").remove(&(room, class));
        if let Some(slot) = removed {
            if let Some(handle) = slot.handle {
                handle.abort();
            }
        }
    }

    /// Cancels every timer the room still has armed. Called when a
    /// room finishes or is destroyed.
    pub fn cancel_all(&self, room: RoomId) {
        let mut slots = self.slots.lock().expect("timer slot lock");
        slots.retain(|(r, _), slot| {
            if *r == room {
                if let Some(handle) = slot.handle.take() {
                    handle.abort();
                }
                false
            } else {
                true
            }
        });
    }

    /// Number of currently armed timers (all rooms).
    pub fn armed_count(&self) -> usize {
        self.slots.lock().expect("timer slot lock").len()
    }
}

impl Default for DeadlineScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Durations
// ---------------------------------------------------------------------------

/// The fixed duration table for turn clocks and round windows.
#[derive(Debug, Clone)]
pub struct TimerProfile {
    /// Turn clock, standard mode.
    pub turn_standard: Duration,
    /// Turn clock, hardcore mode.
    pub turn_hardcore: Duration,
    /// Choice-duel pick window.
    pub choice_window: Duration,
    /// Rapid-tap counting window.
    pub tap_window: Duration,
    /// Reflex duel: how long after the go signal before the round
    /// auto-resolves as unanswered.
    pub reflex_go_window: Duration,
    /// Reflex duel: bounds for the hidden arm delay. The room samples
    /// uniformly inside this range.
    pub reflex_delay_min: Duration,
    pub reflex_delay_max: Duration,
    /// Pause between a round result and the next round.
    pub round_gap: Duration,
}

impl Default for TimerProfile {
    fn default() -> Self {
        Self {
            turn_standard: Duration::from_secs(30),
            turn_hardcore: Duration::from_secs(10),
            choice_window: Duration::from_secs(10),
            tap_window: Duration::from_secs(10),
            reflex_go_window: Duration::from_secs(5),
            reflex_delay_min: Duration::from_millis(1_500),
            reflex_delay_max: Duration::from_millis(4_000),
            round_gap: Duration::from_secs(2),
        }
    }
}

impl TimerProfile {
    /// The turn clock for a difficulty tier.
    pub fn turn_duration(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Standard => self.turn_standard,
            Mode::Hardcore => self.turn_hardcore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_turn_tiers() {
        let p = TimerProfile::default();
        assert!(p.turn_duration(Mode::Hardcore) < p.turn_duration(Mode::Standard));
    }

    #[test]
    fn test_profile_reflex_delay_range_is_ordered() {
        let p = TimerProfile::default();
        assert!(p.reflex_delay_min < p.reflex_delay_max);
    }
}
