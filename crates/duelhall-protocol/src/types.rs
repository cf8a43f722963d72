//! Game taxonomy and action types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six supported minigames.
///
/// Turn-based variants alternate single moves under a turn clock;
/// round-based variants resolve in discrete simultaneous rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    /// 3×3 line game, draw on a full board.
    GridCapture,
    /// 3×3 line game with 3 pieces per player; the oldest piece is
    /// evicted before the 4th lands. No draw state.
    CapacityGrid,
    /// 15×15 five-in-a-row.
    FiveInARow,
    /// Best-of-5 reaction duel with a hidden go delay.
    ReflexDuel,
    /// Best-of-3 simultaneous pick among three cyclic options.
    ChoiceDuel,
    /// 3 rounds of fixed-window tap racing.
    RapidTap,
}

impl GameKind {
    /// `true` for games that alternate single moves under a turn clock.
    pub fn is_turn_based(self) -> bool {
        matches!(
            self,
            GameKind::GridCapture | GameKind::CapacityGrid | GameKind::FiveInARow
        )
    }

    /// `true` for games resolved in simultaneous rounds.
    pub fn is_round_based(self) -> bool {
        !self.is_turn_based()
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameKind::GridCapture => "grid_capture",
            GameKind::CapacityGrid => "capacity_grid",
            GameKind::FiveInARow => "five_in_a_row",
            GameKind::ReflexDuel => "reflex_duel",
            GameKind::ChoiceDuel => "choice_duel",
            GameKind::RapidTap => "rapid_tap",
        };
        write!(f, "{s}")
    }
}

/// Difficulty tier: how fast the turn clock runs.
///
/// Only meaningful for turn-based games; round-based games use fixed
/// per-variant windows regardless of mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Standard,
    Hardcore,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Standard => write!(f, "standard"),
            Mode::Hardcore => write!(f, "hardcore"),
        }
    }
}

/// One of the three cyclically-dominant picks in the choice duel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    /// The pick this one defeats.
    pub fn beats(self) -> Choice {
        match self {
            Choice::Rock => Choice::Scissors,
            Choice::Paper => Choice::Rock,
            Choice::Scissors => Choice::Paper,
        }
    }
}

/// A player's in-game action. Which variants are legal depends on the
/// room's [`GameKind`]; the room rejects mismatches before the engine
/// ever sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerAction {
    /// Place a piece at a board position (turn games).
    Place { pos: u16 },
    /// Press the reflex button.
    Press,
    /// Submit a hidden pick.
    Choose { pick: Choice },
    /// Register one tap.
    Tap,
}

/// A terminal result from one player's point of view, as reported to
/// the stats collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_kind_classification() {
        assert!(GameKind::GridCapture.is_turn_based());
        assert!(GameKind::CapacityGrid.is_turn_based());
        assert!(GameKind::FiveInARow.is_turn_based());
        assert!(GameKind::ReflexDuel.is_round_based());
        assert!(GameKind::ChoiceDuel.is_round_based());
        assert!(GameKind::RapidTap.is_round_based());
    }

    #[test]
    fn test_game_kind_snake_case_wire_form() {
        let json = serde_json::to_string(&GameKind::FiveInARow).unwrap();
        assert_eq!(json, "\"five_in_a_row\"");
        let kind: GameKind = serde_json::from_str("\"rapid_tap\"").unwrap();
        assert_eq!(kind, GameKind::RapidTap);
    }

    #[test]
    fn test_choice_dominance_is_cyclic() {
        assert_eq!(Choice::Rock.beats(), Choice::Scissors);
        assert_eq!(Choice::Scissors.beats(), Choice::Paper);
        assert_eq!(Choice::Paper.beats(), Choice::Rock);
    }

    #[test]
    fn test_player_action_tagged_form() {
        let json: serde_json::Value =
            serde_json::to_value(PlayerAction::Place { pos: 4 }).unwrap();
        assert_eq!(json["kind"], "place");
        assert_eq!(json["pos"], 4);

        let json: serde_json::Value =
            serde_json::to_value(PlayerAction::Press).unwrap();
        assert_eq!(json["kind"], "press");
    }

    #[test]
    fn test_mode_default_is_standard() {
        assert_eq!(Mode::default(), Mode::Standard);
    }
}
