//! Grid capture: 3×3, three in a line wins, full board draws.

use duelhall_protocol::{GameSnapshot, Seat};

use crate::{PlacedMove, RuleViolation, Terminal};

/// The 8 winning triples of a 3×3 board (rows, columns, diagonals).
pub(crate) const WIN_TRIPLES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Scans all triples; returns the owner of any completed line.
pub(crate) fn line_owner(cells: &[Option<Seat>; 9]) -> Option<Seat> {
    for [a, b, c] in WIN_TRIPLES {
        if cells[a].is_some() && cells[a] == cells[b] && cells[a] == cells[c] {
            return cells[a];
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct GridCapture {
    cells: [Option<Seat>; 9],
    to_move: Seat,
    moves: u8,
    result: Option<Terminal>,
}

impl GridCapture {
    pub fn new() -> Self {
        Self {
            cells: [None; 9],
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
        if pos >= 9 {
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

        if let Some(winner) = line_owner(&self.cells) {
            self.result = Some(Terminal {
                winner: Some(winner),
            });
        } else if self.moves == 9 {
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

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Board {
            size: 3,
            cells: self.cells.to_vec(),
            to_move: self.to_move,
        }
    }
}

impl Default for GridCapture {
    fn default() -> Self {
        Self::new()
    }
}
