//! Rapid tap: 3 fixed-window rounds, higher tap count takes the round,
//! first to 2 round wins. Tied rounds award nothing.

use duelhall_protocol::{GameSnapshot, Seat};

use crate::{RuleViolation, Terminal, score_winner};

pub const MAX_ROUNDS: u8 = 3;
pub const WIN_ROUNDS: u8 = 2;

/// The resolution of one tap round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapRound {
    pub round: u8,
    pub taps: [u32; 2],
    pub winner: Option<Seat>,
    pub terminal: Option<Terminal>,
}

#[derive(Debug, Clone)]
pub struct RapidTap {
    taps: [u32; 2],
    round_scores: [u8; 2],
    round: u8,
    round_open: bool,
    result: Option<Terminal>,
}

impl RapidTap {
    pub fn new() -> Self {
        Self {
            taps: [0, 0],
            round_scores: [0, 0],
            round: 0,
            round_open: false,
            result: None,
        }
    }

    pub fn taps(&self) -> [u32; 2] {
        self.taps
    }

    pub fn round_scores(&self) -> [u8; 2] {
        self.round_scores
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.result
    }

    /// Whether a counting window is currently open.
    pub fn round_open(&self) -> bool {
        self.round_open
    }

    /// Opens the next counting window with zeroed taps.
    pub fn begin_round(&mut self) -> Result<u8, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if self.round_open {
            return Err(RuleViolation::WrongPhase);
        }
        self.round += 1;
        self.taps = [0, 0];
        self.round_open = true;
        Ok(self.round)
    }

    /// Registers one tap; returns the seat's running count.
    pub fn tap(&mut self, seat: Seat) -> Result<u32, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if !self.round_open {
            return Err(RuleViolation::WrongPhase);
        }
        self.taps[seat.index()] += 1;
        Ok(self.taps[seat.index()])
    }

    /// Closes the window and scores the round. Ties move no score.
    pub fn end_round(&mut self) -> Result<TapRound, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if !self.round_open {
            return Err(RuleViolation::WrongPhase);
        }
        self.round_open = false;

        let winner = match self.taps[0].cmp(&self.taps[1]) {
            std::cmp::Ordering::Greater => Some(Seat::First),
            std::cmp::Ordering::Less => Some(Seat::Second),
            std::cmp::Ordering::Equal => None,
        };
        if let Some(seat) = winner {
            self.round_scores[seat.index()] += 1;
        }

        if self.round_scores[0] >= WIN_ROUNDS
            || self.round_scores[1] >= WIN_ROUNDS
            || self.round >= MAX_ROUNDS
        {
            self.result = Some(Terminal {
                winner: score_winner(self.round_scores),
            });
        }

        Ok(TapRound {
            round: self.round,
            taps: self.taps,
            winner,
            terminal: self.result,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Taps {
            round: self.round,
            taps: self.taps,
            round_scores: self.round_scores,
        }
    }
}

impl Default for RapidTap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_round(g: &mut RapidTap, first_taps: u32, second_taps: u32) -> TapRound {
        g.begin_round().unwrap();
        for _ in 0..first_taps {
            g.tap(Seat::First).unwrap();
        }
        for _ in 0..second_taps {
            g.tap(Seat::Second).unwrap();
        }
        g.end_round().unwrap()
    }

    #[test]
    fn test_higher_count_takes_the_round() {
        let mut g = RapidTap::new();
        let r = run_round(&mut g, 12, 9);
        assert_eq!(r.winner, Some(Seat::First));
        assert_eq!(r.taps, [12, 9]);
        assert_eq!(g.round_scores(), [1, 0]);
    }

    #[test]
    fn test_tied_round_awards_nothing() {
        let mut g = RapidTap::new();
        let r = run_round(&mut g, 7, 7);
        assert_eq!(r.winner, None);
        assert_eq!(g.round_scores(), [0, 0]);
        assert_eq!(r.terminal, None);
    }

    #[test]
    fn test_two_round_wins_end_the_game() {
        let mut g = RapidTap::new();
        run_round(&mut g, 10, 5);
        let r = run_round(&mut g, 11, 6);
        assert_eq!(
            r.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
        assert_eq!(g.begin_round(), Err(RuleViolation::GameOver));
    }

    #[test]
    fn test_three_rounds_higher_round_score_wins() {
        let mut g = RapidTap::new();
        run_round(&mut g, 10, 5); // First
        run_round(&mut g, 3, 8); // Second
        let r = run_round(&mut g, 9, 4); // First
        assert_eq!(
            r.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_all_rounds_tied_is_a_draw() {
        let mut g = RapidTap::new();
        run_round(&mut g, 5, 5);
        run_round(&mut g, 0, 0);
        let r = run_round(&mut g, 2, 2);
        assert_eq!(r.terminal, Some(Terminal { winner: None }));
    }

    #[test]
    fn test_tap_outside_window_rejected() {
        let mut g = RapidTap::new();
        assert_eq!(g.tap(Seat::First), Err(RuleViolation::WrongPhase));
        run_round(&mut g, 1, 0);
        assert_eq!(g.tap(Seat::First), Err(RuleViolation::WrongPhase));
    }
}
