//! Per-connection handler: lobby entry and command routing.
//!
//! Each accepted websocket gets its own Tokio task running this
//! handler. The flow is:
//!   1. Receive `Hello` → assign a player id, send `Welcome`
//!   2. Loop: decode commands → dispatch to matchmaker or room
//!   3. On close: sweep the player out of queues and rooms
//!
//! Outbound traffic is decoupled from the read loop: room actors and
//! the dispatcher push [`ServerEvent`]s into a per-player channel, and
//! a pump task drains it into the websocket sink. A slow client can
//! therefore never stall a room.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use duelhall_matchmaker::MatchOutcome;
use duelhall_protocol::{ClientCommand, PlayerId, RejectReason, RoomId, ServerEvent};
use duelhall_room::{PlayerSender, RoomError, RoomHandle, Seating, StatsRecorder};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::server::{Profile, ServerState};
use crate::DuelhallError;

/// Counter for assigning player ids to fresh connections.
static NEXT_PLAYER_ID: AtomicU64 = AtomicU64::new(1);

/// How long a fresh connection may idle before sending `Hello`.
const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<tokio::net::TcpStream>;

/// Handles a single connection from websocket upgrade to close.
pub(crate) async fn handle_connection<S: StatsRecorder>(
    ws: WsStream,
    state: Arc<ServerState<S>>,
) -> Result<(), DuelhallError> {
    let (mut sink, mut stream) = ws.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ServerEvent>();

    // Outbound pump: runs until every sender clone (this handler, the
    // lobby profile, any room seat) is gone.
    let pump = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let text = match duelhall_protocol::encode(&event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    let result = drive_connection(&mut stream, &state, &event_tx).await;

    drop(event_tx);
    let _ = pump.await;
    result
}

/// The read loop proper, separated so cleanup runs on every exit path.
async fn drive_connection<S: StatsRecorder>(
    stream: &mut futures_util::stream::SplitStream<WsStream>,
    state: &Arc<ServerState<S>>,
    event_tx: &PlayerSender,
) -> Result<(), DuelhallError> {
    // First message must be Hello.
    let player_id = match hello(stream, state, event_tx).await? {
        Some(id) => id,
        None => return Ok(()),
    };
    tracing::info!(%player_id, "player joined the lobby");

    let mut clean_bye = false;
    while let Some(msg) = stream.next().await {
        let bytes = match msg {
            Ok(Message::Text(text)) => text.as_bytes().to_vec(),
            Ok(Message::Binary(data)) => data.to_vec(),
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };
        let cmd: ClientCommand = match duelhall_protocol::decode(&bytes) {
            Ok(cmd) => cmd,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "undecodable command");
                reject(
                    event_tx,
                    RejectReason::InvalidAction,
                    "could not decode command",
                );
                continue;
            }
        };
        if dispatch(state, player_id, event_tx, cmd).await {
            clean_bye = true;
            break;
        }
    }

    if clean_bye {
        tracing::info!(%player_id, "player said goodbye");
    } else {
        tracing::info!(%player_id, "connection dropped");
    }
    cleanup(state, player_id).await;
    Ok(())
}

/// Waits for the opening `Hello`, registers the player, and welcomes
/// them. `None` means the connection went away first.
async fn hello<S: StatsRecorder>(
    stream: &mut futures_util::stream::SplitStream<WsStream>,
    state: &Arc<ServerState<S>>,
    event_tx: &PlayerSender,
) -> Result<Option<PlayerId>, DuelhallError> {
    let msg = match tokio::time::timeout(HELLO_TIMEOUT, stream.next()).await {
        Ok(Some(Ok(Message::Text(text)))) => text.as_bytes().to_vec(),
        Ok(Some(Ok(Message::Binary(data)))) => data.to_vec(),
        Ok(Some(Ok(_))) | Ok(None) => return Ok(None),
        Ok(Some(Err(e))) => return Err(e.into()),
        Err(_) => {
            tracing::debug!("hello timed out");
            return Ok(None);
        }
    };

    let (nickname, account_id) = match duelhall_protocol::decode::<ClientCommand>(&msg)? {
        ClientCommand::Hello {
            nickname,
            account_id,
        } => (nickname, account_id),
        other => {
            tracing::debug!(?other, "first message was not hello");
            reject(event_tx, RejectReason::InvalidAction, "say hello first");
            return Ok(None);
        }
    };

    let player_id = PlayerId(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed));
    {
        let mut gateway = state.gateway.lock().await;
        gateway.players.insert(
            player_id,
            Profile {
                nickname,
                account_id,
                sender: event_tx.clone(),
            },
        );
    }
    let _ = event_tx.send(ServerEvent::Welcome { player_id });
    Ok(Some(player_id))
}

/// Routes one command. Returns `true` when the connection should
/// close (clean goodbye).
async fn dispatch<S: StatsRecorder>(
    state: &Arc<ServerState<S>>,
    player_id: PlayerId,
    event_tx: &PlayerSender,
    cmd: ClientCommand,
) -> bool {
    match cmd {
        ClientCommand::Hello { .. } => {
            reject(event_tx, RejectReason::InvalidAction, "already in the lobby");
        }

        ClientCommand::FindMatch { game, mode } => {
            let mut gateway = state.gateway.lock().await;
            if let Some(room) = gateway.rooms.player_room(player_id) {
                tracing::debug!(%player_id, %room, "find_match while seated");
                reject(event_tx, RejectReason::InvalidAction, "already in a room");
                return false;
            }
            match gateway.matchmaker.request_match(player_id, game, mode) {
                MatchOutcome::Queued => {
                    let _ = event_tx.send(ServerEvent::Queued { game, mode });
                }
                MatchOutcome::Paired { opponent } => {
                    let Some(first) = gateway.players.get(&opponent).map(|p| Seating {
                        id: opponent,
                        nickname: p.nickname.clone(),
                        account_id: p.account_id,
                        sender: p.sender.clone(),
                    }) else {
                        // The waiter vanished between dequeue and
                        // pairing; this player becomes the waiter.
                        gateway.matchmaker.request_match(player_id, game, mode);
                        let _ = event_tx.send(ServerEvent::Queued { game, mode });
                        return false;
                    };
                    let second = gateway
                        .players
                        .get(&player_id)
                        .map(|p| Seating {
                            id: player_id,
                            nickname: p.nickname.clone(),
                            account_id: p.account_id,
                            sender: p.sender.clone(),
                        })
                        .expect("dispatching player is registered");
                    gateway.rooms.create_room(game, mode, first, second);
                }
            }
        }

        ClientCommand::CancelMatch { game, mode } => {
            let mut gateway = state.gateway.lock().await;
            if gateway.matchmaker.cancel_match(player_id, game, mode) {
                let _ = event_tx.send(ServerEvent::MatchCancelled { game, mode });
            }
        }

        ClientCommand::Action { room, action } => {
            let sent = match room_handle(state, player_id, room).await {
                Ok(handle) => handle.submit_action(player_id, action).await,
                Err(e) => Err(e),
            };
            if let Err(e) = sent {
                reject(event_tx, RejectReason::NotFound, &e.to_string());
            }
        }

        ClientCommand::Rematch { room } => {
            let sent = match room_handle(state, player_id, room).await {
                Ok(handle) => handle.request_rematch(player_id).await,
                Err(e) => Err(e),
            };
            if let Err(e) = sent {
                reject(event_tx, RejectReason::NotFound, &e.to_string());
            }
        }

        ClientCommand::CancelRematch { room } => {
            let sent = match room_handle(state, player_id, room).await {
                Ok(handle) => handle.cancel_rematch(player_id).await,
                Err(e) => Err(e),
            };
            if let Err(e) = sent {
                reject(event_tx, RejectReason::NotFound, &e.to_string());
            }
        }

        ClientCommand::LeaveRoom { room } => {
            let left = match room_handle(state, player_id, room).await {
                Ok(handle) => handle.leave(player_id).await,
                Err(e) => Err(e),
            };
            match left {
                Ok(outcome) => {
                    let mut gateway = state.gateway.lock().await;
                    gateway.rooms.settle_leave(player_id, room, outcome);
                }
                Err(e) => reject(event_tx, RejectReason::NotFound, &e.to_string()),
            }
        }

        ClientCommand::Bye => return true,
    }
    false
}

/// Disconnect sweep: out of every queue, out of any room (an
/// abandonment when the game was still running), out of the lobby.
async fn cleanup<S: StatsRecorder>(state: &Arc<ServerState<S>>, player_id: PlayerId) {
    let handle = {
        let mut gateway = state.gateway.lock().await;
        gateway.matchmaker.remove_player(player_id);
        gateway.players.remove(&player_id);
        gateway
            .rooms
            .player_room(player_id)
            .and_then(|room| gateway.rooms.handle_for(player_id, room).ok())
    };
    let Some(handle) = handle else { return };

    let room = handle.room_id();
    match handle.leave(player_id).await {
        Ok(outcome) => {
            let mut gateway = state.gateway.lock().await;
            gateway.rooms.settle_leave(player_id, room, outcome);
            tracing::debug!(%player_id, %room, "removed from room on disconnect");
        }
        Err(err) => tracing::warn!(%player_id, %room, %err, "disconnect leave failed"),
    }
}

/// Resolves a room handle inside a short lock scope. Room commands are
/// awaited on the returned clone with the gateway lock released, so a
/// room with a backed-up channel cannot stall other connections.
async fn room_handle<S: StatsRecorder>(
    state: &Arc<ServerState<S>>,
    player_id: PlayerId,
    room: RoomId,
) -> Result<RoomHandle, RoomError> {
    state.gateway.lock().await.rooms.handle_for(player_id, room)
}

fn reject(event_tx: &PlayerSender, reason: RejectReason, detail: &str) {
    let _ = event_tx.send(ServerEvent::Rejected {
        reason,
        detail: detail.to_string(),
    });
}
