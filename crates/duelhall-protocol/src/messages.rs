//! Client commands and server events.
//!
//! Both enums are internally tagged (`#[serde(tag = "type")]`) so the
//! wire form is flat JSON objects that are trivial to handle from a
//! browser client.

use serde::{Deserialize, Serialize};

use crate::{Choice, GameKind, Mode, PlayerAction, PlayerId, RoomId, Seat};

/// Everything a client may send to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// First message on every connection: enter the lobby.
    Hello {
        nickname: String,
        #[serde(default)]
        account_id: Option<u64>,
    },
    /// Ask to be matched for (game, mode).
    FindMatch { game: GameKind, mode: Mode },
    /// Leave the waiting queue for (game, mode).
    CancelMatch { game: GameKind, mode: Mode },
    /// An in-game action for a room the player is seated in.
    Action { room: RoomId, action: PlayerAction },
    /// Vote for a rematch in a finished room.
    Rematch { room: RoomId },
    /// Retract a rematch vote before the opponent has voted.
    CancelRematch { room: RoomId },
    /// Leave a room (abandonment if the game is still running).
    LeaveRoom { room: RoomId },
    /// Clean goodbye; the connection closes after this.
    Bye,
}

/// A player as seen by their opponent in room payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatedPlayer {
    pub id: PlayerId,
    pub nickname: String,
    pub seat: Seat,
}

/// Public game state, broadcast inside room events. Per-variant shape;
/// hidden information (undisclosed picks, pending go delays) never
/// appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameSnapshot {
    /// Turn-based board games. `cells` is row-major, `size * size` long.
    Board {
        size: u16,
        cells: Vec<Option<Seat>>,
        to_move: Seat,
    },
    /// Reflex duel: per-seat points and the current round number.
    Reflex { round: u8, scores: [u8; 2] },
    /// Choice duel: per-seat round wins and who has already picked.
    Choice {
        round: u8,
        scores: [u8; 2],
        chosen: [bool; 2],
    },
    /// Rapid tap: current-round taps and per-seat round wins.
    Taps {
        round: u8,
        taps: [u32; 2],
        round_scores: [u8; 2],
    },
}

/// How one round of a round-based game came out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum RoundDetail {
    Reflex {
        winner: Option<Seat>,
        false_start: bool,
        reaction_ms: Option<u64>,
    },
    Choice {
        picks: [Choice; 2],
        winner: Option<Seat>,
    },
    Taps {
        taps: [u32; 2],
        winner: Option<Seat>,
    },
}

/// Why a command was rejected. Maps the error taxonomy onto the wire:
/// a move that loses the race against a finalizing timeout surfaces as
/// `InvalidAction` like any other illegal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidAction,
    NotFound,
}

/// Everything the server may push to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Reply to `Hello`: the player's assigned id.
    Welcome { player_id: PlayerId },
    /// No compatible waiter yet; the player is queued.
    Queued { game: GameKind, mode: Mode },
    /// The player's queue entry was removed on request.
    MatchCancelled { game: GameKind, mode: Mode },

    /// A room started (fresh match or completed rematch vote).
    /// `to_act`/`deadline_ms` are set for turn-based games only.
    RoomStarted {
        room: RoomId,
        game: GameKind,
        mode: Mode,
        players: Vec<SeatedPlayer>,
        snapshot: GameSnapshot,
        to_act: Option<PlayerId>,
        deadline_ms: Option<u64>,
    },
    /// A turn-based move was applied. `to_act`/`deadline_ms` are set
    /// while the game continues; a game-ending move carries neither
    /// and is followed by `RoomFinished`.
    StateUpdated {
        room: RoomId,
        snapshot: GameSnapshot,
        last_pos: u16,
        /// Capacity grid: the cell the mover's oldest piece vacated.
        removed_pos: Option<u16>,
        to_act: Option<PlayerId>,
        deadline_ms: Option<u64>,
    },
    /// The player on the clock ran out; a random legal move was
    /// applied on their behalf (the move itself arrives as a normal
    /// `StateUpdated` or `RoomFinished`).
    TurnSkipped {
        room: RoomId,
        player: PlayerId,
        auto_pos: u16,
    },

    /// A round is being set up (reflex: armed phase; choice: pick
    /// window open; taps: counting window open).
    RoundReady {
        room: RoomId,
        round: u8,
        /// Length of the response window, when it is public knowledge.
        /// Hidden for the reflex arm delay.
        window_ms: Option<u64>,
    },
    /// Reflex duel: the go signal.
    RoundGo { room: RoomId, round: u8 },
    /// Rapid tap: live per-seat counts.
    TapCount { room: RoomId, taps: [u32; 2] },
    /// A round resolved. `replay` means the same round number runs
    /// again (choice-duel draw).
    RoundResult {
        room: RoomId,
        round: u8,
        detail: RoundDetail,
        scores: [u8; 2],
        replay: bool,
    },

    /// Terminal event; sent exactly once per finished game.
    RoomFinished {
        room: RoomId,
        winner: Option<PlayerId>,
        winner_nickname: Option<String>,
        draw: bool,
        snapshot: GameSnapshot,
    },
    /// The opponent abandoned the room.
    OpponentLeft { room: RoomId },

    /// The player's own rematch vote is in; waiting for the opponent.
    RematchWaiting { room: RoomId },
    /// The opponent asked for a rematch.
    RematchRequested { room: RoomId, from: String },
    /// The opponent retracted their rematch vote.
    RematchCancelled { room: RoomId },

    /// A command was rejected; sent only to the issuing player.
    Rejected { reason: RejectReason, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_command_hello_wire_shape() {
        let json: serde_json::Value = serde_json::to_value(ClientCommand::Hello {
            nickname: "ana".into(),
            account_id: Some(12),
        })
        .unwrap();
        assert_eq!(json["type"], "hello");
        assert_eq!(json["nickname"], "ana");
        assert_eq!(json["account_id"], 12);
    }

    #[test]
    fn test_client_command_hello_account_id_optional() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"hello","nickname":"bo"}"#).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::Hello {
                nickname: "bo".into(),
                account_id: None
            }
        );
    }

    #[test]
    fn test_client_command_action_round_trip() {
        let cmd = ClientCommand::Action {
            room: RoomId(4),
            action: PlayerAction::Place { pos: 8 },
        };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let decoded: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn test_server_event_room_started_wire_shape() {
        let ev = ServerEvent::RoomStarted {
            room: RoomId(1),
            game: GameKind::GridCapture,
            mode: Mode::Standard,
            players: vec![SeatedPlayer {
                id: PlayerId(7),
                nickname: "ana".into(),
                seat: Seat::First,
            }],
            snapshot: GameSnapshot::Board {
                size: 3,
                cells: vec![None; 9],
                to_move: Seat::First,
            },
            to_act: Some(PlayerId(7)),
            deadline_ms: Some(30_000),
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "room_started");
        assert_eq!(json["game"], "grid_capture");
        assert_eq!(json["snapshot"]["game"], "board");
        assert_eq!(json["to_act"], 7);
    }

    #[test]
    fn test_server_event_round_result_round_trip() {
        let ev = ServerEvent::RoundResult {
            room: RoomId(2),
            round: 1,
            detail: RoundDetail::Choice {
                picks: [Choice::Rock, Choice::Rock],
                winner: None,
            },
            scores: [0, 0],
            replay: true,
        };
        let bytes = serde_json::to_vec(&ev).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ev, decoded);
    }

    #[test]
    fn test_server_event_rejected_wire_shape() {
        let ev = ServerEvent::Rejected {
            reason: RejectReason::InvalidAction,
            detail: "cell already occupied".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "rejected");
        assert_eq!(json["reason"], "invalid_action");
    }

    #[test]
    fn test_unknown_command_type_is_an_error() {
        let r: Result<ClientCommand, _> =
            serde_json::from_str(r#"{"type":"fly_to_moon"}"#);
        assert!(r.is_err());
    }
}
