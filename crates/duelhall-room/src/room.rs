//! Room actor: an isolated Tokio task that owns one live match.
//!
//! Each room runs in its own task and is the single writer for its
//! state: player commands arrive through an mpsc channel, timer fires
//! through a second channel, and the actor interleaves them one at a
//! time. A move and a deadline racing for the same turn are therefore
//! decided by arrival order; the loser is rejected or discarded like
//! any other stale input.

use std::collections::HashSet;

use duelhall_engine::{Engine, PlacedMove, RuleViolation, Terminal};
use duelhall_protocol::{
    Choice, GameKind, Mode, Outcome, PlayerAction, PlayerId, RejectReason, RoomId, RoundDetail,
    Seat, SeatedPlayer, ServerEvent,
};
use duelhall_timer::{DeadlineScheduler, TimerClass, TimerFired, TimerProfile};
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::{MatchRecord, RoomError, RoomStatus, StatsRecorder};

/// Channel sender for delivering server events to one player's
/// connection handler.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// One player's identity and outbound channel, as handed to a room at
/// creation.
#[derive(Debug, Clone)]
pub struct Seating {
    pub id: PlayerId,
    pub nickname: String,
    pub account_id: Option<u64>,
    pub sender: PlayerSender,
}

/// What a leave resolved to. `room_empty` tells the registry to drop
/// its handle; the actor exits on its own.
#[derive(Debug, Clone, Copy)]
pub struct LeaveOutcome {
    pub room_empty: bool,
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// An in-game action. Rejections go straight to the issuing
    /// player's event channel; no reply here.
    Action {
        player: PlayerId,
        action: PlayerAction,
    },
    /// A rematch vote.
    Rematch { player: PlayerId },
    /// Retract a rematch vote.
    CancelRematch { player: PlayerId },
    /// Remove a player (explicit leave or disconnect).
    Leave {
        player: PlayerId,
        reply: oneshot::Sender<Result<LeaveOutcome, RoomError>>,
    },
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub async fn submit_action(
        &self,
        player: PlayerId,
        action: PlayerAction,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { player, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn request_rematch(&self, player: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Rematch { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn cancel_rematch(&self, player: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::CancelRematch { player })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn leave(&self, player: PlayerId) -> Result<LeaveOutcome, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<S: StatsRecorder> {
    room_id: RoomId,
    game: GameKind,
    mode: Mode,
    status: RoomStatus,
    /// Indexed by seat; `None` once that player has left. Rematch
    /// swaps the slots so the previously-second player acts first.
    seats: [Option<Seating>; 2],
    engine: Engine,
    scheduler: DeadlineScheduler,
    profile: TimerProfile,
    timer_tx: duelhall_timer::TimerSender,
    timer_rx: mpsc::UnboundedReceiver<TimerFired>,
    receiver: mpsc::Receiver<RoomCommand>,
    rematch_votes: HashSet<PlayerId>,
    /// Generation of the timer this room considers live. A fire with
    /// any other generation lost a race and is discarded.
    armed_generation: Option<u64>,
    /// When the reflex go signal went out; measures reaction latency.
    go_at: Option<Instant>,
    stats: S,
}

impl<S: StatsRecorder> RoomActor<S> {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, game = ?self.game, mode = ?self.mode, "room started");
        self.start_match();

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => {
                        if self.handle_command(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                Some(fired) = self.timer_rx.recv() => {
                    self.handle_timer(fired);
                }
            }
        }

        self.scheduler.cancel_all(self.room_id);
        tracing::info!(room_id = %self.room_id, "room stopped");
    }

    /// Returns `true` when the room has emptied and the actor should
    /// exit.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Action { player, action } => {
                self.handle_action(player, action);
                false
            }
            RoomCommand::Rematch { player } => {
                self.handle_rematch(player);
                false
            }
            RoomCommand::CancelRematch { player } => {
                self.handle_cancel_rematch(player);
                false
            }
            RoomCommand::Leave { player, reply } => {
                let result = self.handle_leave(player);
                let empty = matches!(result, Ok(LeaveOutcome { room_empty: true }));
                let _ = reply.send(result);
                empty
            }
        }
    }

    // -- match lifecycle ---------------------------------------------------

    /// Transitions into Playing and announces the fresh game. Also the
    /// rematch restart path.
    fn start_match(&mut self) {
        debug_assert!(self.status.can_transition_to(RoomStatus::Playing));
        self.status = RoomStatus::Playing;

        let turn_based = self.game.is_turn_based();
        let (to_act, deadline_ms) = if turn_based {
            let duration = self.profile.turn_duration(self.mode);
            (
                self.engine.to_move().map(|s| self.seat_player(s)),
                Some(duration.as_millis() as u64),
            )
        } else {
            (None, None)
        };

        self.broadcast(ServerEvent::RoomStarted {
            room: self.room_id,
            game: self.game,
            mode: self.mode,
            players: self.seated_players(),
            snapshot: self.engine.snapshot(),
            to_act,
            deadline_ms,
        });

        if turn_based {
            let duration = self.profile.turn_duration(self.mode);
            self.arm(TimerClass::Turn, duration);
        } else {
            // Round 1 opens after the usual inter-round gap so clients
            // have the start payload before play begins.
            self.arm(TimerClass::Round, self.profile.round_gap);
        }
    }

    /// Commits the terminal outcome: exactly one broadcast, then the
    /// stats calls, queued strictly afterwards.
    fn finish(&mut self, terminal: Terminal) {
        if self.status.is_finished() {
            return;
        }
        debug_assert!(self.status.can_transition_to(RoomStatus::Finished));
        self.status = RoomStatus::Finished;
        self.scheduler.cancel_all(self.room_id);
        self.armed_generation = None;
        self.go_at = None;

        let winner = terminal.winner.map(|s| self.seat_player(s));
        let winner_nickname = terminal
            .winner
            .and_then(|s| self.seats[s.index()].as_ref())
            .map(|slot| slot.nickname.clone());

        tracing::info!(room_id = %self.room_id, winner = ?winner, "game finished");
        self.broadcast(ServerEvent::RoomFinished {
            room: self.room_id,
            winner,
            winner_nickname,
            draw: terminal.winner.is_none(),
            snapshot: self.engine.snapshot(),
        });
        self.report_outcomes(terminal.winner, true);
    }

    fn handle_leave(&mut self, player: PlayerId) -> Result<LeaveOutcome, RoomError> {
        let seat = self
            .seat_of(player)
            .ok_or(RoomError::NotSeated(player, self.room_id))?;

        if self.status.is_playing() {
            // Abandonment: the leaver forfeits, no experience awarded.
            self.status = RoomStatus::Finished;
            self.scheduler.cancel_all(self.room_id);
            self.armed_generation = None;
            self.go_at = None;
            tracing::info!(room_id = %self.room_id, %player, "abandoned");
            self.report_outcomes(Some(seat.other()), false);
        }

        self.rematch_votes.clear();
        self.seats[seat.index()] = None;
        self.send_to_seat(
            seat.other(),
            ServerEvent::OpponentLeft {
                room: self.room_id,
            },
        );

        let room_empty = self.seats.iter().all(Option::is_none);
        Ok(LeaveOutcome { room_empty })
    }

    // -- rematch -----------------------------------------------------------

    fn handle_rematch(&mut self, player: PlayerId) {
        let Some(seat) = self.seat_of(player) else {
            return;
        };
        if !self.status.is_finished() {
            self.reject(player, RejectReason::InvalidAction, "game is still running");
            return;
        }
        if self.seats[seat.other().index()].is_none() {
            self.reject(player, RejectReason::InvalidAction, "opponent has left");
            return;
        }

        self.rematch_votes.insert(player);
        if self.rematch_votes.len() == 2 {
            self.rematch_votes.clear();
            // Seat order swaps so the other player opens this time.
            self.seats.swap(0, 1);
            self.engine = Engine::new(self.game);
            tracing::info!(room_id = %self.room_id, "rematch starting");
            self.start_match();
        } else {
            let nickname = self.seats[seat.index()]
                .as_ref()
                .map(|slot| slot.nickname.clone())
                .unwrap_or_default();
            self.send_to_seat(
                seat,
                ServerEvent::RematchWaiting {
                    room: self.room_id,
                },
            );
            self.send_to_seat(
                seat.other(),
                ServerEvent::RematchRequested {
                    room: self.room_id,
                    from: nickname,
                },
            );
        }
    }

    fn handle_cancel_rematch(&mut self, player: PlayerId) {
        let Some(seat) = self.seat_of(player) else {
            return;
        };
        if self.rematch_votes.remove(&player) {
            self.send_to_seat(
                seat.other(),
                ServerEvent::RematchCancelled {
                    room: self.room_id,
                },
            );
        }
    }

    // -- player actions ----------------------------------------------------

    fn handle_action(&mut self, player: PlayerId, action: PlayerAction) {
        let Some(seat) = self.seat_of(player) else {
            self.reject(player, RejectReason::NotFound, "not seated in this room");
            return;
        };
        if !self.status.is_playing() {
            // Covers moves that lost the race against a finalizing
            // timeout or an abandonment.
            self.reject(player, RejectReason::InvalidAction, "game is not running");
            return;
        }

        match action {
            PlayerAction::Place { pos } => self.handle_place(seat, pos, false),
            PlayerAction::Press => self.handle_press(seat),
            PlayerAction::Choose { pick } => self.handle_choose(seat, pick),
            PlayerAction::Tap => self.handle_tap(seat),
        }
    }

    fn handle_place(&mut self, seat: Seat, pos: u16, auto: bool) {
        let result = self.engine.place(seat, pos);
        match result {
            Ok(placed) => {
                self.cancel_armed(TimerClass::Turn);
                self.broadcast_placed(placed);
                if let Some(terminal) = placed.terminal {
                    self.finish(terminal);
                } else {
                    self.arm(TimerClass::Turn, self.profile.turn_duration(self.mode));
                }
            }
            Err(violation) => {
                if auto {
                    // A substituted move is picked from legal cells;
                    // this would mean the legality scan is wrong.
                    tracing::error!(room_id = %self.room_id, ?violation, pos, "auto move rejected");
                } else {
                    self.reject_seat(seat, violation);
                }
            }
        }
    }

    fn broadcast_placed(&self, placed: PlacedMove) {
        let (to_act, deadline_ms) = if placed.terminal.is_none() {
            (
                self.engine.to_move().map(|s| self.seat_player(s)),
                Some(self.profile.turn_duration(self.mode).as_millis() as u64),
            )
        } else {
            (None, None)
        };
        self.broadcast(ServerEvent::StateUpdated {
            room: self.room_id,
            snapshot: self.engine.snapshot(),
            last_pos: placed.pos,
            removed_pos: placed.removed,
            to_act,
            deadline_ms,
        });
    }

    fn handle_press(&mut self, seat: Seat) {
        let reaction_ms = self.go_at.map(|at| at.elapsed().as_millis() as u64);
        let result = match &mut self.engine {
            Engine::ReflexDuel(e) => e.press(seat, reaction_ms),
            _ => Err(RuleViolation::WrongAction),
        };
        match result {
            Ok(round) => {
                self.cancel_armed(TimerClass::Round);
                self.go_at = None;
                let scores = match &self.engine {
                    Engine::ReflexDuel(e) => e.scores(),
                    _ => unreachable!("press accepted by a non-reflex engine"),
                };
                self.broadcast(ServerEvent::RoundResult {
                    room: self.room_id,
                    round: round.round,
                    detail: RoundDetail::Reflex {
                        winner: round.winner,
                        false_start: round.false_start,
                        reaction_ms: round.reaction_ms,
                    },
                    scores,
                    replay: false,
                });
                self.after_round();
            }
            Err(violation) => self.reject_seat(seat, violation),
        }
    }

    fn handle_choose(&mut self, seat: Seat, pick: Choice) {
        let result = match &mut self.engine {
            Engine::ChoiceDuel(e) => e.choose(seat, pick),
            _ => Err(RuleViolation::WrongAction),
        };
        match result {
            Ok(true) => {
                self.cancel_armed(TimerClass::Round);
                self.resolve_choice_round();
            }
            // First pick of the round stays hidden; nothing to send.
            Ok(false) => {}
            Err(violation) => self.reject_seat(seat, violation),
        }
    }

    fn handle_tap(&mut self, seat: Seat) {
        let result = match &mut self.engine {
            Engine::RapidTap(e) => e.tap(seat),
            _ => Err(RuleViolation::WrongAction),
        };
        match result {
            Ok(_) => {
                let taps = match &self.engine {
                    Engine::RapidTap(e) => e.taps(),
                    _ => unreachable!("tap accepted by a non-tap engine"),
                };
                self.broadcast(ServerEvent::TapCount {
                    room: self.room_id,
                    taps,
                });
            }
            Err(violation) => self.reject_seat(seat, violation),
        }
    }

    /// Resolves a choice round once both picks are in (or were
    /// substituted). A draw replays the same round with a fresh pick
    /// window.
    fn resolve_choice_round(&mut self) {
        let result = match &mut self.engine {
            Engine::ChoiceDuel(e) => e.resolve_round(),
            _ => return,
        };
        let round = match result {
            Ok(round) => round,
            Err(violation) => {
                tracing::error!(room_id = %self.room_id, ?violation, "choice resolution failed");
                return;
            }
        };
        let scores = match &self.engine {
            Engine::ChoiceDuel(e) => e.scores(),
            _ => unreachable!(),
        };
        self.broadcast(ServerEvent::RoundResult {
            room: self.room_id,
            round: round.round,
            detail: RoundDetail::Choice {
                picks: round.picks,
                winner: round.winner,
            },
            scores,
            replay: round.replay,
        });
        if round.replay {
            self.broadcast(ServerEvent::RoundReady {
                room: self.room_id,
                round: round.round,
                window_ms: Some(self.profile.choice_window.as_millis() as u64),
            });
            self.arm(TimerClass::Round, self.profile.choice_window);
        } else {
            self.after_round();
        }
    }

    /// After a settled (non-replay) round: finish on a terminal
    /// engine, otherwise schedule the next round.
    fn after_round(&mut self) {
        if let Some(terminal) = self.engine.terminal() {
            self.finish(terminal);
        } else if self.status.is_playing() {
            self.arm(TimerClass::Round, self.profile.round_gap);
        }
    }

    // -- timers ------------------------------------------------------------

    fn handle_timer(&mut self, fired: TimerFired) {
        if self.armed_generation != Some(fired.generation) {
            tracing::trace!(room_id = %self.room_id, generation = fired.generation, "stale timer fire");
            return;
        }
        self.armed_generation = None;
        if !self.status.is_playing() {
            return;
        }

        match fired.class {
            TimerClass::Turn => self.handle_turn_timeout(),
            TimerClass::Round => self.handle_round_timeout(),
        }
    }

    /// The player on the clock ran out: play a uniformly random legal
    /// move on their behalf, through the same path a real move takes.
    fn handle_turn_timeout(&mut self) {
        let Some(seat) = self.engine.to_move() else {
            return;
        };
        let legal = self.engine.legal_positions();
        let Some(&pos) = pick_random(&legal) else {
            return;
        };
        tracing::debug!(room_id = %self.room_id, ?seat, pos, "turn timed out, auto move");
        self.broadcast(ServerEvent::TurnSkipped {
            room: self.room_id,
            player: self.seat_player(seat),
            auto_pos: pos,
        });
        self.handle_place(seat, pos, true);
    }

    fn handle_round_timeout(&mut self) {
        match self.game {
            GameKind::ReflexDuel => self.advance_reflex(),
            GameKind::ChoiceDuel => self.advance_choice(),
            GameKind::RapidTap => self.advance_taps(),
            _ => {}
        }
    }

    /// Reflex rounds are driven entirely by the round timer: the gap
    /// timer opens the round armed, the hidden delay timer releases
    /// the go signal, the go-window timer settles an unanswered round.
    fn advance_reflex(&mut self) {
        use duelhall_engine::ReflexPhase;

        let phase = match &self.engine {
            Engine::ReflexDuel(e) => e.phase(),
            _ => return,
        };
        match phase {
            ReflexPhase::Idle => {
                let round = match &mut self.engine {
                    Engine::ReflexDuel(e) => e.begin_round(),
                    _ => return,
                };
                let Ok(round) = round else { return };
                self.broadcast(ServerEvent::RoundReady {
                    room: self.room_id,
                    round,
                    // The arm delay is the whole game; never disclosed.
                    window_ms: None,
                });
                let delay = self.sample_reflex_delay();
                self.arm(TimerClass::Round, delay);
            }
            ReflexPhase::Armed => {
                let round = match &mut self.engine {
                    Engine::ReflexDuel(e) => {
                        if e.signal_go().is_err() {
                            return;
                        }
                        e.round()
                    }
                    _ => return,
                };
                self.go_at = Some(Instant::now());
                self.broadcast(ServerEvent::RoundGo {
                    room: self.room_id,
                    round,
                });
                self.arm(TimerClass::Round, self.profile.reflex_go_window);
            }
            ReflexPhase::Go => {
                let round = match &mut self.engine {
                    Engine::ReflexDuel(e) => e.resolve_unanswered(),
                    _ => return,
                };
                let Ok(round) = round else { return };
                self.go_at = None;
                let scores = match &self.engine {
                    Engine::ReflexDuel(e) => e.scores(),
                    _ => unreachable!(),
                };
                self.broadcast(ServerEvent::RoundResult {
                    room: self.room_id,
                    round: round.round,
                    detail: RoundDetail::Reflex {
                        winner: None,
                        false_start: false,
                        reaction_ms: None,
                    },
                    scores,
                    replay: false,
                });
                self.after_round();
            }
        }
    }

    /// Choice rounds: the gap timer opens the pick window; an expired
    /// window substitutes a uniformly random pick for anyone who has
    /// not chosen, then resolves normally.
    fn advance_choice(&mut self) {
        let open = match &self.engine {
            Engine::ChoiceDuel(e) => e.round_open(),
            _ => return,
        };
        if !open {
            let round = match &mut self.engine {
                Engine::ChoiceDuel(e) => e.begin_round(),
                _ => return,
            };
            let Ok(round) = round else { return };
            self.broadcast(ServerEvent::RoundReady {
                room: self.room_id,
                round,
                window_ms: Some(self.profile.choice_window.as_millis() as u64),
            });
            self.arm(TimerClass::Round, self.profile.choice_window);
        } else {
            if let Engine::ChoiceDuel(e) = &mut self.engine {
                for seat in [Seat::First, Seat::Second] {
                    if !e.has_chosen(seat) {
                        let _ = e.choose(seat, random_choice());
                    }
                }
            }
            self.resolve_choice_round();
        }
    }

    /// Tap rounds: the gap timer opens the counting window; the window
    /// timer closes it and scores the round.
    fn advance_taps(&mut self) {
        let open = match &self.engine {
            Engine::RapidTap(e) => e.round_open(),
            _ => return,
        };
        if !open {
            let round = match &mut self.engine {
                Engine::RapidTap(e) => e.begin_round(),
                _ => return,
            };
            let Ok(round) = round else { return };
            self.broadcast(ServerEvent::RoundReady {
                room: self.room_id,
                round,
                window_ms: Some(self.profile.tap_window.as_millis() as u64),
            });
            self.arm(TimerClass::Round, self.profile.tap_window);
        } else {
            let round = match &mut self.engine {
                Engine::RapidTap(e) => e.end_round(),
                _ => return,
            };
            let Ok(round) = round else { return };
            let round_scores = match &self.engine {
                Engine::RapidTap(e) => e.round_scores(),
                _ => unreachable!(),
            };
            self.broadcast(ServerEvent::RoundResult {
                room: self.room_id,
                round: round.round,
                detail: RoundDetail::Taps {
                    taps: round.taps,
                    winner: round.winner,
                },
                scores: round_scores,
                replay: false,
            });
            self.after_round();
        }
    }

    fn arm(&mut self, class: TimerClass, duration: std::time::Duration) {
        let generation = self
            .scheduler
            .arm(self.room_id, class, duration, self.timer_tx.clone());
        self.armed_generation = Some(generation);
    }

    fn cancel_armed(&mut self, class: TimerClass) {
        self.scheduler.cancel(self.room_id, class);
        self.armed_generation = None;
    }

    fn sample_reflex_delay(&self) -> std::time::Duration {
        let min = self.profile.reflex_delay_min.as_millis() as u64;
        let max = self.profile.reflex_delay_max.as_millis() as u64;
        std::time::Duration::from_millis(rand::rng().random_range(min..=max))
    }

    // -- reporting and plumbing --------------------------------------------

    /// One fire-and-forget stats call per seated player, queued after
    /// the terminal broadcast has gone out.
    fn report_outcomes(&self, winner: Option<Seat>, rated: bool) {
        for seat in [Seat::First, Seat::Second] {
            let Some(slot) = &self.seats[seat.index()] else {
                continue;
            };
            let outcome = match winner {
                None => Outcome::Draw,
                Some(w) if w == seat => Outcome::Win,
                Some(_) => Outcome::Loss,
            };
            let record = MatchRecord {
                room: self.room_id,
                game: self.game,
                mode: self.mode,
                player: slot.id,
                opponent: self.seat_player(seat.other()),
                account_id: slot.account_id,
                outcome,
                rated,
            };
            let stats = self.stats.clone();
            tokio::spawn(async move {
                stats.record(record).await;
            });
        }
    }

    fn seat_of(&self, player: PlayerId) -> Option<Seat> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|seat| {
                self.seats[seat.index()]
                    .as_ref()
                    .is_some_and(|s| s.id == player)
            })
    }

    /// The player id at a seat. Seats are only read for players that
    /// are still present on every call path.
    fn seat_player(&self, seat: Seat) -> PlayerId {
        let slot = self.seats[seat.index()].as_ref();
        debug_assert!(slot.is_some(), "reading a vacated seat");
        slot.map(|slot| slot.id).unwrap_or(PlayerId(0))
    }

    fn seated_players(&self) -> Vec<SeatedPlayer> {
        [Seat::First, Seat::Second]
            .into_iter()
            .filter_map(|seat| {
                self.seats[seat.index()].as_ref().map(|s| SeatedPlayer {
                    id: s.id,
                    nickname: s.nickname.clone(),
                    seat,
                })
            })
            .collect()
    }

    fn reject(&self, player: PlayerId, reason: RejectReason, detail: &str) {
        self.send_to_player(
            player,
            ServerEvent::Rejected {
                reason,
                detail: detail.to_string(),
            },
        );
    }

    fn reject_seat(&self, seat: Seat, violation: RuleViolation) {
        if let Some(slot) = &self.seats[seat.index()] {
            let _ = slot.sender.send(ServerEvent::Rejected {
                reason: RejectReason::InvalidAction,
                detail: violation.to_string(),
            });
        }
    }

    fn broadcast(&self, event: ServerEvent) {
        for slot in self.seats.iter().flatten() {
            let _ = slot.sender.send(event.clone());
        }
    }

    fn send_to_seat(&self, seat: Seat, event: ServerEvent) {
        if let Some(slot) = &self.seats[seat.index()] {
            let _ = slot.sender.send(event);
        }
    }

    fn send_to_player(&self, player: PlayerId, event: ServerEvent) {
        if let Some(slot) = self.seats.iter().flatten().find(|s| s.id == player) {
            let _ = slot.sender.send(event);
        }
    }
}

fn pick_random(positions: &[u16]) -> Option<&u16> {
    if positions.is_empty() {
        return None;
    }
    Some(&positions[rand::rng().random_range(0..positions.len())])
}

fn random_choice() -> Choice {
    match rand::rng().random_range(0..3u8) {
        0 => Choice::Rock,
        1 => Choice::Paper,
        _ => Choice::Scissors,
    }
}

/// Spawns a room actor task for a freshly paired match and returns a
/// handle to it. The first seating acts first.
pub(crate) fn spawn_room<S: StatsRecorder>(
    room_id: RoomId,
    game: GameKind,
    mode: Mode,
    first: Seating,
    second: Seating,
    scheduler: DeadlineScheduler,
    profile: TimerProfile,
    stats: S,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);
    let (timer_tx, timer_rx) = mpsc::unbounded_channel();

    let actor = RoomActor {
        room_id,
        game,
        mode,
        status: RoomStatus::Waiting,
        seats: [Some(first), Some(second)],
        engine: Engine::new(game),
        scheduler,
        profile,
        timer_tx,
        timer_rx,
        receiver: rx,
        rematch_votes: HashSet::new(),
        armed_generation: None,
        go_at: None,
        stats,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
