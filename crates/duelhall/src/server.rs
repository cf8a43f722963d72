//! `DuelhallServer` builder and accept loop.
//!
//! This is the entry point for running a Duelhall match server. It
//! ties the layers together: websocket gateway → matchmaker → room
//! registry.

use std::collections::HashMap;
use std::sync::Arc;

use duelhall_matchmaker::Matchmaker;
use duelhall_protocol::PlayerId;
use duelhall_room::{PlayerSender, RoomRegistry, StatsRecorder};
use duelhall_timer::TimerProfile;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::DuelhallError;

/// A connected player as the gateway sees them: identity plus the
/// channel their events are pumped through.
#[derive(Debug, Clone)]
pub(crate) struct Profile {
    pub(crate) nickname: String,
    pub(crate) account_id: Option<u64>,
    pub(crate) sender: PlayerSender,
}

/// Everything behind the gateway lock: the matchmaker, the room
/// registry, and the connected-player table.
///
/// One lock for all three keeps pairing atomic: popping a waiter,
/// reading both profiles, and creating the room happen under a single
/// critical section, so a disconnect cannot interleave. Lock scopes
/// stay synchronous: handlers resolve a room handle under the lock and
/// await the room only after releasing it.
pub(crate) struct Gateway<S: StatsRecorder> {
    pub(crate) matchmaker: Matchmaker,
    pub(crate) rooms: RoomRegistry<S>,
    pub(crate) players: HashMap<PlayerId, Profile>,
}

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S: StatsRecorder> {
    pub(crate) gateway: Mutex<Gateway<S>>,
}

/// Builder for configuring and starting a Duelhall server.
///
/// # Example
///
/// ```rust,ignore
/// use duelhall::prelude::*;
///
/// let server = DuelhallServerBuilder::new()
///     .bind("0.0.0.0:9000")
///     .build(NoopStats)
///     .await?;
/// server.run().await
/// ```
pub struct DuelhallServerBuilder {
    bind_addr: String,
    profile: TimerProfile,
}

impl DuelhallServerBuilder {
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            profile: TimerProfile::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Overrides the turn-clock and round-window durations.
    pub fn timer_profile(mut self, profile: TimerProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Binds the listener and builds the server with the given stats
    /// backend.
    pub async fn build<S: StatsRecorder>(
        self,
        stats: S,
    ) -> Result<DuelhallServer<S>, DuelhallError> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "listening");

        let state = Arc::new(ServerState {
            gateway: Mutex::new(Gateway {
                matchmaker: Matchmaker::new(),
                rooms: RoomRegistry::with_profile(stats, self.profile),
                players: HashMap::new(),
            }),
        });

        Ok(DuelhallServer { listener, state })
    }
}

impl Default for DuelhallServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Duelhall match server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DuelhallServer<S: StatsRecorder> {
    listener: TcpListener,
    state: Arc<ServerState<S>>,
}

impl<S: StatsRecorder> DuelhallServer<S> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop: upgrades each TCP connection to a
    /// websocket and spawns a handler task for it. Runs until the
    /// process is terminated.
    pub async fn run(self) -> Result<(), DuelhallError> {
        tracing::info!("Duelhall server running");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let ws = match tokio_tungstenite::accept_async(stream).await {
                            Ok(ws) => ws,
                            Err(e) => {
                                tracing::debug!(%addr, error = %e, "websocket handshake failed");
                                return;
                            }
                        };
                        if let Err(e) = handle_connection(ws, state).await {
                            tracing::debug!(%addr, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
