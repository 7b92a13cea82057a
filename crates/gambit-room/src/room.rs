//! Room actor: an isolated Tokio task that owns a [`Table`].
//!
//! The room runs in its own task and communicates with connection handlers
//! through an mpsc channel. No lock is ever held across the game; the
//! channel is the only way in, and the actor processes one command at a
//! time in arrival order.

use gambit_protocol::{ClientMessage, Color, Outcome, RejectReason};
use gambit_rules::{RulesEngine, ShakmatyEngine};
use gambit_session::Assignment;
use gambit_transport::ConnectionId;
use tokio::sync::{mpsc, oneshot};

use crate::{Outbox, RoomConfig, RoomError, Table};

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends a command and waits for the answer on it.
enum RoomCommand {
    /// A transport connection was established.
    Connect {
        conn: ConnectionId,
        outbox: Outbox,
        reply: oneshot::Sender<Assignment>,
    },

    /// A transport connection went away.
    Disconnect { conn: ConnectionId },

    /// A decoded client message.
    Message {
        conn: ConnectionId,
        msg: ClientMessage,
    },

    /// A frame from `conn` that could not be understood.
    Reject {
        conn: ConnectionId,
        reason: RejectReason,
    },

    /// Request a metadata snapshot.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of room metadata for operators and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    /// Holder of the first-mover seat.
    pub first_mover: Option<ConnectionId>,
    /// Holder of the second-mover seat.
    pub second_mover: Option<ConnectionId>,
    /// Players and spectators currently connected.
    pub connections: usize,
    /// Whose move it is.
    pub side_to_move: Color,
    /// The canonical position.
    pub fen: String,
    /// Set once the game has ended.
    pub outcome: Option<Outcome>,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. Every connection
/// task holds one.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Joins `conn` to the game. Its role greeting and the initial
    /// snapshot are already queued on `outbox` when this returns.
    pub async fn connect(
        &self,
        conn: ConnectionId,
        outbox: Outbox,
    ) -> Result<Assignment, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::Connect {
            conn,
            outbox,
            reply,
        })
        .await?;
        rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Removes `conn` from the game, freeing its seat.
    pub async fn disconnect(&self, conn: ConnectionId) -> Result<(), RoomError> {
        self.send(RoomCommand::Disconnect { conn }).await
    }

    /// Delivers a client message (fire-and-forget; any answer arrives on
    /// the connection's outbox).
    pub async fn submit(
        &self,
        conn: ConnectionId,
        msg: ClientMessage,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Message { conn, msg }).await
    }

    /// Sends `conn` a move rejection, queued behind anything the room has
    /// already produced for it.
    pub async fn reject(
        &self,
        conn: ConnectionId,
        reason: RejectReason,
    ) -> Result<(), RoomError> {
        self.send(RoomCommand::Reject { conn, reason }).await
    }

    /// Requests the current room info.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply }).await?;
        rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor<E: RulesEngine> {
    table: Table<E>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl<E: RulesEngine> RoomActor<E> {
    /// Runs the actor loop, processing commands until shutdown or until
    /// every handle is dropped.
    async fn run(mut self) {
        tracing::info!(fen = %self.table.engine().dump(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Connect {
                    conn,
                    outbox,
                    reply,
                } => {
                    let assignment = self.table.on_connect(conn, outbox);
                    let _ = reply.send(assignment);
                }
                RoomCommand::Disconnect { conn } => {
                    self.table.on_disconnect(conn);
                }
                RoomCommand::Message { conn, msg } => {
                    self.table.handle(conn, msg);
                }
                RoomCommand::Reject { conn, reason } => {
                    self.table.reject(conn, reason);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!("room shutting down");
                    break;
                }
            }
        }

        tracing::info!("room actor stopped");
    }

    fn info(&self) -> RoomInfo {
        use gambit_protocol::Role;

        let registry = self.table.registry();
        let engine = self.table.engine();
        RoomInfo {
            first_mover: registry.holder(Role::FirstMover),
            second_mover: registry.holder(Role::SecondMover),
            connections: self.table.connection_count(),
            side_to_move: engine.side_to_move(),
            fen: engine.dump(),
            outcome: engine.terminal(),
        }
    }
}

/// Spawns a room actor around `engine` and returns a handle to it.
///
/// `config.channel_size` bounds the command channel: when it fills up,
/// connection tasks wait (backpressure).
pub fn spawn_room<E: RulesEngine>(engine: E, config: &RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = RoomActor {
        table: Table::new(engine),
        receiver: rx,
    };
    tokio::spawn(actor.run());

    RoomHandle { sender: tx }
}

/// Spawns a standard chess room starting from `config`'s start position.
///
/// # Errors
/// [`RoomError::Rules`] if the configured start position is not valid FEN.
pub fn spawn_chess_room(config: &RoomConfig) -> Result<RoomHandle, RoomError> {
    let engine = ShakmatyEngine::with_start(config.start_fen())?;
    Ok(spawn_room(engine, config))
}
