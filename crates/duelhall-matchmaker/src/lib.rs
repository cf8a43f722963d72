//! FIFO matchmaking queues keyed by `(GameKind, Mode)`.
//!
//! A player sits in at most one queue system-wide. Requesting a match
//! while already waiting moves the player to the new queue rather than
//! duplicating the entry, so a player can never be paired with itself.
//!
//! The matchmaker is plain data with no interior locking; the server
//! owns one instance and serializes access to it.

use std::collections::{HashMap, VecDeque};

use duelhall_protocol::{GameKind, Mode, PlayerId};

/// What a match request produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// No compatible waiter; the player is now queued.
    Queued,
    /// Paired with the waiter who has been in the queue longest. The
    /// waiter takes the first seat, the requester the second.
    Paired { opponent: PlayerId },
}

#[derive(Debug, Default)]
pub struct Matchmaker {
    queues: HashMap<(GameKind, Mode), VecDeque<PlayerId>>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs `player` with the oldest waiter for `(game, mode)`, or
    /// enqueues them when nobody is waiting.
    pub fn request_match(&mut self, player: PlayerId, game: GameKind, mode: Mode) -> MatchOutcome {
        // One queue entry per player: a new request supersedes any
        // earlier one, whatever key it was under.
        self.remove_player(player);

        let queue = self.queues.entry((game, mode)).or_default();
        match queue.pop_front() {
            Some(opponent) => {
                tracing::debug!(%player, %opponent, ?game, ?mode, "paired");
                MatchOutcome::Paired { opponent }
            }
            None => {
                queue.push_back(player);
                tracing::debug!(%player, ?game, ?mode, "queued");
                MatchOutcome::Queued
            }
        }
    }

    /// Removes `player` from the `(game, mode)` queue. Returns whether
    /// an entry was actually removed.
    pub fn cancel_match(&mut self, player: PlayerId, game: GameKind, mode: Mode) -> bool {
        let Some(queue) = self.queues.get_mut(&(game, mode)) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|p| *p != player);
        let removed = queue.len() != before;
        if queue.is_empty() {
            self.queues.remove(&(game, mode));
        }
        removed
    }

    /// Removes `player` from whichever queue holds them. Called on
    /// disconnect and before re-queueing.
    pub fn remove_player(&mut self, player: PlayerId) -> bool {
        let mut removed = false;
        self.queues.retain(|_, queue| {
            let before = queue.len();
            queue.retain(|p| *p != player);
            removed |= queue.len() != before;
            !queue.is_empty()
        });
        removed
    }

    /// Total waiters across all queues.
    pub fn waiting_count(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }
}
