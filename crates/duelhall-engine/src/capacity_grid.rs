//! Capacity grid: 3×3 with at most 3 pieces per player.
//!
//! Placing a 4th piece first evicts that player's oldest surviving
//! piece, so the board never fills and no draw state exists — play
//! continues until a line forms.

use duelhall_protocol::{GameSnapshot, Seat};

use crate::grid_capture::line_owner;
use crate::{PlacedMove, RuleViolation, Terminal};

const MAX_PIECES_PER_SEAT: usize = 3;

#[derive(Debug, Clone)]
pub struct CapacityGrid {
    cells: [Option<Seat>; 9],
    /// Placement order of the pieces still on the board, oldest first.
    history: Vec<(u16, Seat)>,
    to_move: Seat,
    result: Option<Terminal>,
}

impl CapacityGrid {
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
            history: Vec::new(),
            to_move: Seat::First,
            result: None,
        }
    }

    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.result
    }

    pub fn empty_cells(&self) -> Vec<u16> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i as u16)
            .collect()
    }

    /// How many of `seat`'s pieces are on the board.
    pub fn piece_count(&self, seat: Seat) -> usize {
        self.cells.iter().filter(|c| **c == Some(seat)).count()
    }

    /// The cell that will be vacated if `seat` places now, if any.
    /// Clients use this to preview the doomed piece.
    pub fn next_to_vacate(&self, seat: Seat) -> Option<u16> {
        if self.piece_count(seat) < MAX_PIECES_PER_SEAT {
            return None;
        }
        self.oldest_piece(seat)
    }

    fn oldest_piece(&self, seat: Seat) -> Option<u16> {
        self.history
            .iter()
            .find(|(_, s)| *s == seat)
            .map(|(pos, _)| *pos)
    }

    pub fn place(&mut self, seat: Seat, pos: u16) -> Result<PlacedMove, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if pos >= 9 {
            return Err(RuleViolation::OutOfRange);
        }
        if seat != self.to_move {
            return Err(RuleViolation::NotYourTurn);
        }
        if self.cells[pos as usize].is_some() {
            return Err(RuleViolation::CellOccupied);
        }

        // At capacity: the oldest piece leaves before the new one lands.
        let mut removed = None;
        if self.piece_count(seat) >= MAX_PIECES_PER_SEAT {
            if let Some(old) = self.oldest_piece(seat) {
                self.cells[old as usize] = None;
                self.history.retain(|(p, s)| !(*p == old && *s == seat));
                removed = Some(old);
            }
        }

        self.cells[pos as usize] = Some(seat);
        self.history.push((pos, seat));

        if let Some(winner) = line_owner(&self.cells) {
            self.result = Some(Terminal {
                winner: Some(winner),
            });
        } else {
            self.to_move = self.to_move.other();
        }

        Ok(PlacedMove {
            pos,
            removed,
            terminal: self.result,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Board {
            size: 3,
            cells: self.cells.to_vec(),
            to_move: self.to_move,
        }
    }
}

impl Default for CapacityGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plays moves alternating seats, asserting each is accepted.
    fn play(g: &mut CapacityGrid, moves: &[(Seat, u16)]) -> Vec<PlacedMove> {
        moves
            .iter()
            .map(|(seat, pos)| g.place(*seat, *pos).unwrap())
            .collect()
    }

    #[test]
    fn test_fourth_piece_evicts_oldest() {
        let mut g = CapacityGrid::new();
        // First: 0, 2, 6 (avoiding a line); Second: 1, 5, 7.
        play(
            &mut g,
            &[
                (Seat::First, 0),
                (Seat::Second, 1),
                (Seat::First, 2),
                (Seat::Second, 5),
                (Seat::First, 6),
                (Seat::Second, 7),
            ],
        );
        assert_eq!(g.piece_count(Seat::First), 3);
        assert_eq!(g.next_to_vacate(Seat::First), Some(0));

        // 4th piece for First: position 0 (the oldest) must vacate.
        let m = g.place(Seat::First, 3).unwrap();
        assert_eq!(m.removed, Some(0));
        assert_eq!(g.piece_count(Seat::First), 3);
        assert_eq!(g.empty_cells().contains(&0), true);
        // Next eviction candidate rolls forward to position 2.
        assert_eq!(g.next_to_vacate(Seat::First), Some(2));
    }

    #[test]
    fn test_no_eviction_below_capacity() {
        let mut g = CapacityGrid::new();
        let m = g.place(Seat::First, 4).unwrap();
        assert_eq!(m.removed, None);
        assert_eq!(g.next_to_vacate(Seat::Second), None);
    }

    #[test]
    fn test_line_after_eviction_wins() {
        let mut g = CapacityGrid::new();
        play(
            &mut g,
            &[
                (Seat::First, 0),
                (Seat::Second, 3),
                (Seat::First, 4),
                (Seat::Second, 5),
                (Seat::First, 2),
                (Seat::Second, 7),
            ],
        );
        // First places at 6: evicts 0, and 2-4-6 completes a line.
        let m = g.place(Seat::First, 6).unwrap();
        assert_eq!(m.removed, Some(0));
        assert_eq!(
            m.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_evicted_cell_can_be_reused() {
        let mut g = CapacityGrid::new();
        play(
            &mut g,
            &[
                (Seat::First, 0),
                (Seat::Second, 1),
                (Seat::First, 2),
                (Seat::Second, 5),
                (Seat::First, 6),
                (Seat::Second, 7),
                (Seat::First, 3), // evicts 0
            ],
        );
        // Second may now occupy the vacated cell 0.
        let m = g.place(Seat::Second, 0).unwrap();
        // Second was at capacity too: their oldest (1) vacates.
        assert_eq!(m.removed, Some(1));
        assert_eq!(g.piece_count(Seat::Second), 3);
    }

    #[test]
    fn test_occupied_and_turn_rules_still_apply() {
        let mut g = CapacityGrid::new();
        g.place(Seat::First, 0).unwrap();
        assert_eq!(g.place(Seat::Second, 0), Err(RuleViolation::CellOccupied));
        assert_eq!(g.place(Seat::First, 1), Err(RuleViolation::NotYourTurn));
    }
}
