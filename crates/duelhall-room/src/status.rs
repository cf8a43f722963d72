//! Room lifecycle states and the legal transitions between them.

use std::fmt;

/// Where a room is in its lifecycle.
///
/// Transitions only move forward, with one exception: a completed
/// rematch vote takes a finished room back to `Playing` with a fresh
/// engine. A room never re-enters `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    /// Created, second player not yet seated.
    Waiting,
    /// Both players seated, game in progress.
    Playing,
    /// Terminal outcome committed (win, draw, or abandonment).
    Finished,
}

impl RoomStatus {
    /// Whether moving from `self` to `to` is a legal transition.
    pub fn can_transition_to(&self, to: RoomStatus) -> bool {
        use RoomStatus::*;
        matches!(
            (self, to),
            (Waiting, Playing) | (Playing, Finished) | (Finished, Playing)
        )
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, RoomStatus::Playing)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RoomStatus::Finished)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Playing => "playing",
            RoomStatus::Finished => "finished",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_are_legal() {
        assert!(RoomStatus::Waiting.can_transition_to(RoomStatus::Playing));
        assert!(RoomStatus::Playing.can_transition_to(RoomStatus::Finished));
    }

    #[test]
    fn test_rematch_reopens_a_finished_room() {
        assert!(RoomStatus::Finished.can_transition_to(RoomStatus::Playing));
    }

    #[test]
    fn test_waiting_is_never_re_entered() {
        assert!(!RoomStatus::Playing.can_transition_to(RoomStatus::Waiting));
        assert!(!RoomStatus::Finished.can_transition_to(RoomStatus::Waiting));
    }

    #[test]
    fn test_no_skipping_straight_to_finished() {
        assert!(!RoomStatus::Waiting.can_transition_to(RoomStatus::Finished));
    }
}
