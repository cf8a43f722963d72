//! Identity newtypes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a player, assigned by the gateway when the
/// player enters the lobby.
///
/// `#[serde(transparent)]` keeps the wire form a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one live match between two players).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// One of the two seats in a room.
///
/// `First` is the seat that acts (or chooses) first; the matchmaker
/// gives it to the longer-waiting player, and a rematch swaps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    /// The opposing seat.
    pub fn other(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Index into two-element per-seat arrays.
    pub fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::First => write!(f, "first"),
            Seat::Second => write!(f, "second"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_room_id_deserializes_from_plain_number() {
        let rid: RoomId = serde_json::from_str("7").unwrap();
        assert_eq!(rid, RoomId(7));
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(PlayerId(3).to_string(), "P-3");
        assert_eq!(RoomId(9).to_string(), "R-9");
    }

    #[test]
    fn test_seat_other_and_index_are_consistent() {
        assert_eq!(Seat::First.other(), Seat::Second);
        assert_eq!(Seat::Second.other(), Seat::First);
        assert_eq!(Seat::First.index(), 0);
        assert_eq!(Seat::First.other().index(), 1);
    }
}
