//! Choice duel: simultaneous picks among three cyclic options,
//! best-of-3, first to 2 round wins. A drawn round replays under the
//! same round number with no penalty.

use duelhall_protocol::{Choice, GameSnapshot, Seat};

use crate::{RuleViolation, Terminal};

pub const WIN_SCORE: u8 = 2;

/// The resolution of one choice round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceRound {
    pub round: u8,
    pub picks: [Choice; 2],
    pub winner: Option<Seat>,
    /// `true` when the round drew and the same round number replays.
    pub replay: bool,
    pub terminal: Option<Terminal>,
}

#[derive(Debug, Clone)]
pub struct ChoiceDuel {
    scores: [u8; 2],
    round: u8,
    picks: [Option<Choice>; 2],
    round_open: bool,
    result: Option<Terminal>,
}

impl ChoiceDuel {
    pub fn new() -> Self {
        Self {
            scores: [0, 0],
            round: 0,
            picks: [None, None],
            round_open: false,
            result: None,
        }
    }

    pub fn scores(&self) -> [u8; 2] {
        self.scores
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.result
    }

    pub fn has_chosen(&self, seat: Seat) -> bool {
        self.picks[seat.index()].is_some()
    }

    /// Whether a pick window is currently open.
    pub fn round_open(&self) -> bool {
        self.round_open
    }

    /// Opens the next round (fresh number). Draw replays do not come
    /// through here — [`ChoiceDuel::resolve_round`] reopens the round
    /// itself.
    pub fn begin_round(&mut self) -> Result<u8, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if self.round_open {
            return Err(RuleViolation::WrongPhase);
        }
        self.round += 1;
        self.picks = [None, None];
        self.round_open = true;
        Ok(self.round)
    }

    /// Records a hidden pick. Returns `true` once both seats have
    /// chosen and the round can resolve.
    pub fn choose(&mut self, seat: Seat, pick: Choice) -> Result<bool, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        if !self.round_open {
            return Err(RuleViolation::WrongPhase);
        }
        if self.picks[seat.index()].is_some() {
            return Err(RuleViolation::AlreadyActed);
        }
        self.picks[seat.index()] = Some(pick);
        Ok(self.picks[0].is_some() && self.picks[1].is_some())
    }

    /// Resolves the round once both picks are in. On a draw the round
    /// reopens with cleared picks and the same number.
    pub fn resolve_round(&mut self) -> Result<ChoiceRound, RuleViolation> {
        if self.result.is_some() {
            return Err(RuleViolation::GameOver);
        }
        let (Some(p0), Some(p1)) = (self.picks[0], self.picks[1]) else {
            return Err(RuleViolation::WrongPhase);
        };

        let winner = if p0 == p1 {
            None
        } else if p0.beats() == p1 {
            Some(Seat::First)
        } else {
            Some(Seat::Second)
        };

        let replay = match winner {
            Some(seat) => {
                self.scores[seat.index()] += 1;
                self.round_open = false;
                if self.scores[seat.index()] >= WIN_SCORE {
                    self.result = Some(Terminal { winner: Some(seat) });
                }
                false
            }
            None => {
                // Same round runs again; no score movement.
                self.picks = [None, None];
                true
            }
        };

        Ok(ChoiceRound {
            round: self.round,
            picks: [p0, p1],
            winner,
            replay,
            terminal: self.result,
        })
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::Choice {
            round: self.round,
            scores: self.scores,
            chosen: [self.picks[0].is_some(), self.picks[1].is_some()],
        }
    }
}

impl Default for ChoiceDuel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(g: &mut ChoiceDuel, p0: Choice, p1: Choice) -> ChoiceRound {
        if !g.round_open {
            g.begin_round().unwrap();
        }
        g.choose(Seat::First, p0).unwrap();
        assert!(g.choose(Seat::Second, p1).unwrap());
        g.resolve_round().unwrap()
    }

    #[test]
    fn test_cyclic_dominance() {
        let mut g = ChoiceDuel::new();
        let r = round(&mut g, Choice::Rock, Choice::Scissors);
        assert_eq!(r.winner, Some(Seat::First));
        let mut g = ChoiceDuel::new();
        let r = round(&mut g, Choice::Rock, Choice::Paper);
        assert_eq!(r.winner, Some(Seat::Second));
        let mut g = ChoiceDuel::new();
        let r = round(&mut g, Choice::Scissors, Choice::Paper);
        assert_eq!(r.winner, Some(Seat::First));
    }

    #[test]
    fn test_draw_replays_same_round_without_score() {
        let mut g = ChoiceDuel::new();
        let r = round(&mut g, Choice::Rock, Choice::Rock);
        assert_eq!(r.winner, None);
        assert!(r.replay);
        assert_eq!(g.scores(), [0, 0]);
        assert_eq!(g.round(), 1);

        // Round is open again under the same number; picks cleared.
        assert!(!g.has_chosen(Seat::First));
        let r = round(&mut g, Choice::Paper, Choice::Rock);
        assert_eq!(r.round, 1);
        assert_eq!(r.winner, Some(Seat::First));
        assert!(!r.replay);
    }

    #[test]
    fn test_double_pick_rejected() {
        let mut g = ChoiceDuel::new();
        g.begin_round().unwrap();
        g.choose(Seat::First, Choice::Rock).unwrap();
        assert_eq!(
            g.choose(Seat::First, Choice::Paper),
            Err(RuleViolation::AlreadyActed)
        );
    }

    #[test]
    fn test_resolve_before_both_chose_is_rejected() {
        let mut g = ChoiceDuel::new();
        g.begin_round().unwrap();
        g.choose(Seat::Second, Choice::Rock).unwrap();
        assert_eq!(g.resolve_round(), Err(RuleViolation::WrongPhase));
    }

    #[test]
    fn test_first_to_two_wins() {
        let mut g = ChoiceDuel::new();
        round(&mut g, Choice::Rock, Choice::Scissors);
        let r = round(&mut g, Choice::Paper, Choice::Rock);
        assert_eq!(
            r.terminal,
            Some(Terminal {
                winner: Some(Seat::First)
            })
        );
        assert_eq!(g.begin_round(), Err(RuleViolation::GameOver));
    }

    #[test]
    fn test_choices_stay_hidden_in_snapshot() {
        let mut g = ChoiceDuel::new();
        g.begin_round().unwrap();
        g.choose(Seat::First, Choice::Scissors).unwrap();
        match g.snapshot() {
            GameSnapshot::Choice { chosen, .. } => {
                assert_eq!(chosen, [true, false]);
            }
            other => panic!("unexpected snapshot {other:?}"),
        }
    }
}
