//! Pure rule state machines for the six Duelhall minigames.
//!
//! Engines hold board/score state and nothing else: no clocks, no
//! randomness, no I/O. Anything nondeterministic (reflex go delays,
//! reaction latencies, substituted choices) is sampled by the room and
//! passed in as plain data, which keeps every engine deterministic and
//! unit-testable.
//!
//! The [`Engine`] enum is a closed tagged union over the fixed variant
//! set — callers dispatch on the tag, never on runtime type inspection.
//! A rematch replaces the whole value with [`Engine::new`]; engines are
//! never reset in place.

mod capacity_grid;
mod choice_duel;
mod five_in_a_row;
mod grid_capture;
mod rapid_tap;
mod reflex;

pub use capacity_grid::CapacityGrid;
pub use choice_duel::{ChoiceDuel, ChoiceRound};
pub use five_in_a_row::FiveInARow;
pub use grid_capture::GridCapture;
pub use rapid_tap::{RapidTap, TapRound};
pub use reflex::{ReflexDuel, ReflexPhase, ReflexRound};

use duelhall_protocol::{GameKind, GameSnapshot, Seat};

/// Why a move or choice was rejected. Rejections carry no state
/// mutation: the engine is untouched when any of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("position is out of range")]
    OutOfRange,
    #[error("not your turn")]
    NotYourTurn,
    #[error("cell already occupied")]
    CellOccupied,
    #[error("game is already over")]
    GameOver,
    #[error("action is not valid in the current phase")]
    WrongPhase,
    #[error("already acted this round")]
    AlreadyActed,
    #[error("action does not belong to this game")]
    WrongAction,
}

/// A finished game: `winner` is `None` for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub winner: Option<Seat>,
}

/// The result of an accepted turn-based move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedMove {
    /// Where the piece landed.
    pub pos: u16,
    /// Capacity grid only: the cell the mover's oldest piece vacated.
    pub removed: Option<u16>,
    /// Set when this move ended the game.
    pub terminal: Option<Terminal>,
}

/// One engine instance, owned by exactly one room.
#[derive(Debug, Clone)]
pub enum Engine {
    GridCapture(GridCapture),
    CapacityGrid(CapacityGrid),
    FiveInARow(FiveInARow),
    ReflexDuel(ReflexDuel),
    ChoiceDuel(ChoiceDuel),
    RapidTap(RapidTap),
}

impl Engine {
    /// Fresh engine for a variant. Also the rematch path: the room
    /// swaps in a new value rather than mutating the old one.
    pub fn new(kind: GameKind) -> Engine {
        match kind {
            GameKind::GridCapture => Engine::GridCapture(GridCapture::new()),
            GameKind::CapacityGrid => Engine::CapacityGrid(CapacityGrid::new()),
            GameKind::FiveInARow => Engine::FiveInARow(FiveInARow::new()),
            GameKind::ReflexDuel => Engine::ReflexDuel(ReflexDuel::new()),
            GameKind::ChoiceDuel => Engine::ChoiceDuel(ChoiceDuel::new()),
            GameKind::RapidTap => Engine::RapidTap(RapidTap::new()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Engine::GridCapture(_) => GameKind::GridCapture,
            Engine::CapacityGrid(_) => GameKind::CapacityGrid,
            Engine::FiveInARow(_) => GameKind::FiveInARow,
            Engine::ReflexDuel(_) => GameKind::ReflexDuel,
            Engine::ChoiceDuel(_) => GameKind::ChoiceDuel,
            Engine::RapidTap(_) => GameKind::RapidTap,
        }
    }

    /// Public state for broadcast.
    pub fn snapshot(&self) -> GameSnapshot {
        match self {
            Engine::GridCapture(e) => e.snapshot(),
            Engine::CapacityGrid(e) => e.snapshot(),
            Engine::FiveInARow(e) => e.snapshot(),
            Engine::ReflexDuel(e) => e.snapshot(),
            Engine::ChoiceDuel(e) => e.snapshot(),
            Engine::RapidTap(e) => e.snapshot(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.terminal().is_some()
    }

    pub fn terminal(&self) -> Option<Terminal> {
        match self {
            Engine::GridCapture(e) => e.terminal(),
            Engine::CapacityGrid(e) => e.terminal(),
            Engine::FiveInARow(e) => e.terminal(),
            Engine::ReflexDuel(e) => e.terminal(),
            Engine::ChoiceDuel(e) => e.terminal(),
            Engine::RapidTap(e) => e.terminal(),
        }
    }

    /// The seat on the clock, for turn-based variants.
    pub fn to_move(&self) -> Option<Seat> {
        match self {
            Engine::GridCapture(e) => Some(e.to_move()),
            Engine::CapacityGrid(e) => Some(e.to_move()),
            Engine::FiveInARow(e) => Some(e.to_move()),
            _ => None,
        }
    }

    /// Applies a turn-based placement. Round-based variants report
    /// [`RuleViolation::WrongAction`].
    pub fn place(&mut self, seat: Seat, pos: u16) -> Result<PlacedMove, RuleViolation> {
        match self {
            Engine::GridCapture(e) => e.place(seat, pos),
            Engine::CapacityGrid(e) => e.place(seat, pos),
            Engine::FiveInARow(e) => e.place(seat, pos),
            _ => Err(RuleViolation::WrongAction),
        }
    }

    /// Empty cells a timed-out player could legally occupy. Empty for
    /// round-based variants and finished games.
    pub fn legal_positions(&self) -> Vec<u16> {
        if self.is_over() {
            return Vec::new();
        }
        match self {
            Engine::GridCapture(e) => e.empty_cells(),
            Engine::CapacityGrid(e) => e.empty_cells(),
            Engine::FiveInARow(e) => e.empty_cells(),
            _ => Vec::new(),
        }
    }
}

/// Decides the winner of a score race once it is over: strictly higher
/// score wins, equal scores draw.
pub(crate) fn score_winner(scores: [u8; 2]) -> Option<Seat> {
    match scores[0].cmp(&scores[1]) {
        std::cmp::Ordering::Greater => Some(Seat::First),
        std::cmp::Ordering::Less => Some(Seat::Second),
        std::cmp::Ordering::Equal => None,
    }
}
