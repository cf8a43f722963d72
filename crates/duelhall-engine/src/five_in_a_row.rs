//! Five-in-a-row on a 15×15 board.
//!
//! The win check only scans the four axes through the just-placed
//! cell, counting contiguous same-owner cells in both directions.

use duelhall_protocol::{GameSnapshot, Seat};

use crate::{PlacedMove, RuleViolation, Terminal};

pub(crate) const SIZE: i16 = 15;
pub(crate) const TOTAL_CELLS: u16 = (SIZE * SIZE) as u16; // 225

/// Right, down, down-right, down-left. Each axis is scanned both ways.
const DIRECTIONS: [(i16, i16); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone)]
pub struct FiveInARow {
    cells: Vec<Option<Seat>>,
    to_move: Seat,
    moves: u16,
    result: Option<Terminal>,
}

impl FiveInARow {
    pub fn new() -> Self {
        Self {
            cells: vec![None; TOTAL_CELLS as usize],
            to_move: Seat::First,
            moves: 0,
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

    pub fn place(&mut self, seat: Seat, pos: u16) -> Result<PlacedMove, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if pos >= TOTAL_CELLS {
            return Err(RuleViolation::OutOfRange);
        }
        if seat != self.to_move {
            return Err(RuleViolation::NotYourTurn);
        }
        if self.cells[pos as usize].is_some() {
            return Err(RuleViolation::CellOccupied);
        }

        self.cells[pos as usize] = Some(seat);
        self.moves += 1;

        if self.run_through(pos) >= 5 {
            self.result = Some(Terminal { winner: Some(seat) });
        } else if self.moves == TOTAL_CELLS {
            self.result = Some(Terminal { winner: None });
        } else {
            self.to_move = self.to_move.other();
        }

        Ok(PlacedMove {
            pos,
            removed: None,
            terminal: self.result,
        })
    }

    /// Longest contiguous same-owner run through `pos` over the four
    /// axes.
    fn run_through(&self, pos: u16) -> u16 {
        let owner = self.cells[pos as usize];
        let row = (pos as i16) / SIZE;
        let col = (pos as i16) % SIZE;

        let mut best = 1;
        for (dr, dc) in DIRECTIONS {
            let mut count = 1;
            for sign in [1i16, -1] {
                let (mut r, mut c) = (row + dr * sign, col + dc * sign);
                while (0..SIZE).contains(&r)
                    && (0..SIZE).contains(&c)
                    && self.cells[(r * SIZE + c) as usize] == owner
                {
                    count += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
            }
            best = best.max(count);
        }
        best
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Board {
            size: SIZE as u16,
            cells: self.cells.clone(),
            to_move: self.to_move,
        }
    }
}

impl Default for FiveInARow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: u16, col: u16) -> u16 {
        row * 15 + col
    }

    /// Alternates First along `firsts` and Second along `seconds`.
    /// `firsts` must be one longer; the last First move is returned.
    fn race(firsts: &[u16], seconds: &[u16]) -> (FiveInARow, PlacedMove) {
        assert_eq!(firsts.len(), seconds.len() + 1);
        let mut g = FiveInARow::new();
        for i in 0..seconds.len() {
            g.place(Seat::First, firsts[i]).unwrap();
            g.place(Seat::Second, seconds[i]).unwrap();
        }
        let last = g.place(Seat::First, firsts[seconds.len()]).unwrap();
        (g, last)
    }

    #[test]
    fn test_horizontal_five_wins() {
        let firsts: Vec<u16> = (0..5).map(|c| at(7, c)).collect();
        let seconds: Vec<u16> = (0..4).map(|c| at(9, c)).collect();
        let (_, last) = race(&firsts, &seconds);
        assert_eq!(
            last.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_win_detected_when_gap_is_filled_last() {
        // First owns 7,0..7,4 but plays the middle cell last.
        let firsts = [at(7, 0), at(7, 1), at(7, 3), at(7, 4), at(7, 2)];
        let seconds = [at(1, 0), at(1, 1), at(1, 2), at(1, 3)];
        let (_, last) = race(&firsts, &seconds);
        assert_eq!(
            last.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_diagonal_five_wins() {
        let firsts: Vec<u16> = (0..5).map(|i| at(3 + i, 3 + i)).collect();
        let seconds: Vec<u16> = (0..4).map(|i| at(0, i)).collect();
        let (_, last) = race(&firsts, &seconds);
        assert_eq!(
            last.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_anti_diagonal_five_wins() {
        let firsts: Vec<u16> = (0..5).map(|i| at(4 + i, 10 - i)).collect();
        let seconds: Vec<u16> = (0..4).map(|i| at(0, i)).collect();
        let (_, last) = race(&firsts, &seconds);
        assert_eq!(
            last.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_blocked_four_does_not_win() {
        // Second blocks both ends of First's four: S F F F F S
        let mut g = FiveInARow::new();
        g.place(Seat::First, at(7, 1)).unwrap();
        g.place(Seat::Second, at(7, 0)).unwrap();
        g.place(Seat::First, at(7, 2)).unwrap();
        g.place(Seat::Second, at(7, 5)).unwrap();
        g.place(Seat::First, at(7, 3)).unwrap();
        g.place(Seat::Second, at(0, 0)).unwrap();
        let m = g.place(Seat::First, at(7, 4)).unwrap();
        assert_eq!(m.terminal, None);
        assert!(g.terminal().is_none());
    }

    #[test]
    fn test_run_does_not_wrap_board_edges() {
        // Cells 13, 14 on row 0 and 15, 16 (row 1 cols 0,1) are
        // adjacent in index space but not on the board.
        let mut g = FiveInARow::new();
        g.place(Seat::First, at(0, 13)).unwrap();
        g.place(Seat::Second, at(5, 5)).unwrap();
        g.place(Seat::First, at(0, 14)).unwrap();
        g.place(Seat::Second, at(5, 6)).unwrap();
        g.place(Seat::First, at(1, 0)).unwrap();
        g.place(Seat::Second, at(5, 7)).unwrap();
        g.place(Seat::First, at(1, 1)).unwrap();
        g.place(Seat::Second, at(5, 8)).unwrap();
        let m = g.place(Seat::First, at(1, 2)).unwrap();
        assert_eq!(m.terminal, None);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut g = FiveInARow::new();
        assert_eq!(g.place(Seat::First, 225), Err(RuleViolation::OutOfRange));
    }
}
