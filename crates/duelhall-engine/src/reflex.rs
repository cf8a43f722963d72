//! Reflex duel: best-of-5 reaction rounds, first to 3 points.
//!
//! Round shape: the room arms a hidden delay (Armed phase), then the
//! go signal (Go phase). A press during Armed is a false start and
//! scores the opponent; a press during Go scores the presser. A Go
//! window that elapses with no press settles the round with no point.
//!
//! The engine never reads a clock: the room samples the delay and
//! measures reaction latency, passing both in as data.

use duelhall_protocol::{GameSnapshot, Seat};

use crate::{RuleViolation, Terminal, score_winner};

pub const MAX_ROUNDS: u8 = 5;
pub const WIN_SCORE: u8 = 3;

/// Where the current round stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflexPhase {
    /// No round running (before round 1 or between rounds).
    Idle,
    /// Round armed, go signal not yet given.
    Armed,
    /// Go signal given, waiting for a press.
    Go,
}

/// The resolution of one reflex round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflexRound {
    pub round: u8,
    pub winner: Option<Seat>,
    pub false_start: bool,
    pub reaction_ms: Option<u64>,
    pub terminal: Option<Terminal>,
}

#[derive(Debug, Clone)]
pub struct ReflexDuel {
    scores: [u8; 2],
    round: u8,
    phase: ReflexPhase,
    result: Option<Terminal>,
}

impl ReflexDuel {
    pub fn new() -> Self {
        Self {
            scores: [0, 0],
            round: 0,
            phase: ReflexPhase::Idle,
            result: None,
        }
    }

    pub fn scores(&self) -> [u8; 2] {
        self.scores
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn phase(&self) -> ReflexPhase {
        self.phase
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.result
    }

    /// Opens the next round in the Armed phase and returns its number.
    pub fn begin_round(&mut self) -> Result<u8, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if self.phase != ReflexPhase::Idle {
            return Err(RuleViolation::WrongPhase);
        }
        self.round += 1;
        self.phase = ReflexPhase::Armed;
        Ok(self.round)
    }

    /// The hidden delay elapsed; presses now count as reactions.
    pub fn signal_go(&mut self) -> Result<(), RuleViolation> {
        if self.phase != ReflexPhase::Armed {
            return Err(RuleViolation::WrongPhase);
        }
        self.phase = ReflexPhase::Go;
        Ok(())
    }

    /// A press from `seat`. `reaction_ms` is the room-measured latency
    /// since the go signal; it is ignored during the Armed phase.
    pub fn press(
        &mut self,
        seat: Seat,
        reaction_ms: Option<u64>,
    ) -> Result<ReflexRound, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        match self.phase {
            ReflexPhase::Idle => Err(RuleViolation::WrongPhase),
            ReflexPhase::Armed => {
                // False start: the opponent takes the point, whatever
                // the reaction would have been.
                let winner = seat.other();
                self.scores[winner.index()] += 1;
                Ok(self.settle(Some(winner), true, None))
            }
            ReflexPhase::Go => {
                self.scores[seat.index()] += 1;
                Ok(self.settle(Some(seat), false, reaction_ms))
            }
        }
    }

    /// The Go window elapsed with no press: the round settles with no
    /// point for either side.
    pub fn resolve_unanswered(&mut self) -> Result<ReflexRound, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if self.phase != ReflexPhase::Go {
            return Err(RuleViolation::WrongPhase);
        }
        Ok(self.settle(None, false, None))
    }

    fn settle(
        &mut self,
        winner: Option<Seat>,
        false_start: bool,
        reaction_ms: Option<u64>,
    ) -> ReflexRound {
        self.phase = ReflexPhase::Idle;
        if self.scores[0] >= WIN_SCORE
            || self.scores[1] >= WIN_SCORE
            || self.round >= MAX_ROUNDS
        {
            self.result = Some(Terminal {
                winner: score_winner(self.scores),
            });
        }
        ReflexRound {
            round: self.round,
            winner,
            false_start,
            reaction_ms,
            terminal: self.result,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Reflex {
            round: self.round,
            scores: self.scores,
        }
    }
}

impl Default for ReflexDuel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_false_start_scores_opponent() {
        let mut g = ReflexDuel::new();
        g.begin_round().unwrap();
        // Press while Armed — before any go signal.
        let r = g.press(Seat::First, Some(1)).unwrap();
        assert!(r.false_start);
        assert_eq!(r.winner, Some(Seat::Second));
        assert_eq!(r.reaction_ms, None);
        assert_eq!(g.scores(), [0, 1]);
    }

    #[test]
    fn test_press_after_go_scores_presser_with_latency() {
        let mut g = ReflexDuel::new();
        g.begin_round().unwrap();
        g.signal_go().unwrap();
        let r = g.press(Seat::Second, Some(231)).unwrap();
        assert!(!r.false_start);
        assert_eq!(r.winner, Some(Seat::Second));
        assert_eq!(r.reaction_ms, Some(231));
        assert_eq!(g.scores(), [0, 1]);
    }

    #[test]
    fn test_second_press_in_settled_round_is_rejected() {
        let mut g = ReflexDuel::new();
        g.begin_round().unwrap();
        g.signal_go().unwrap();
        g.press(Seat::First, Some(200)).unwrap();
        assert_eq!(
            g.press(Seat::Second, Some(300)),
            Err(RuleViolation::WrongPhase)
        );
    }

    #[test]
    fn test_first_to_three_wins() {
        let mut g = ReflexDuel::new();
        for _ in 0..3 {
            g.begin_round().unwrap();
            g.signal_go().unwrap();
            let r = g.press(Seat::First, Some(150)).unwrap();
            if g.scores()[0] == 3 {
                assert_eq!(
                    r.terminal,
                    Some(Terminal {
                        winner: Some(Seat::First)
                    })
                );
            } else {
                assert_eq!(r.terminal, None);
            }
        }
        assert!(g.terminal().is_some());
        assert_eq!(g.begin_round(), Err(RuleViolation::GameOver));
    }

    #[test]
    fn test_unanswered_rounds_award_no_points_and_can_draw() {
        let mut g = ReflexDuel::new();
        for round in 1..=MAX_ROUNDS {
            assert_eq!(g.begin_round().unwrap(), round);
            g.signal_go().unwrap();
            let r = g.resolve_unanswered().unwrap();
            assert_eq!(r.winner, None);
        }
        assert_eq!(g.scores(), [0, 0]);
        assert_eq!(g.terminal(), Some(Terminal { winner: None }));
    }

    #[test]
    fn test_five_rounds_higher_score_wins() {
        let mut g = ReflexDuel::new();
        let winners = [
            Seat::First,
            Seat::Second,
            Seat::First,
            Seat::Second,
            Seat::First,
        ];
        for seat in winners {
            g.begin_round().unwrap();
            g.signal_go().unwrap();
            g.press(seat, Some(100)).unwrap();
        }
        assert_eq!(g.scores(), [3, 2]);
        assert_eq!(
            g.terminal(),
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
    }

    #[test]
    fn test_press_before_round_begins_is_rejected() {
        let mut g = ReflexDuel::new();
        assert_eq!(g.press(Seat::First, None), Err(RuleViolation::WrongPhase));
    }
}
