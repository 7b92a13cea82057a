//! The game table: the one owned object holding all shared session state.
//!
//! Role slots, the rules engine, and the per-connection outboxes live
//! together here. Every operation takes `&mut self`, so whoever owns the
//! table (the room actor) is the single serialization point: a move is
//! authorized, applied, and broadcast before the next command is looked at.

use std::panic::{AssertUnwindSafe, catch_unwind};

use gambit_protocol::{ClientMessage, RejectReason, ServerMessage};
use gambit_rules::{ResolvedMove, RulesEngine};
use gambit_session::{Assignment, SessionRegistry};
use gambit_transport::ConnectionId;

use crate::gate::{Decision, MoveIntent, authorize};
use crate::{Broadcaster, Outbox};

/// One game session: seats, position, and audience.
pub struct Table<E: RulesEngine> {
    registry: SessionRegistry,
    engine: E,
    outboxes: Broadcaster,
}

impl<E: RulesEngine> Table<E> {
    /// A table with both seats open, playing on `engine`'s position.
    pub fn new(engine: E) -> Self {
        Self {
            registry: SessionRegistry::new(),
            engine,
            outboxes: Broadcaster::new(),
        }
    }

    /// Read access to the role slots.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Read access to the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of connected parties.
    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }

    // -----------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------

    /// A connection joined: seat it (or make it a spectator), then tell it
    /// what it is, then send the position.
    ///
    /// The role goes first so the client knows which pieces it may drag
    /// before it draws the board.
    pub fn on_connect(&mut self, conn: ConnectionId, outbox: Outbox) -> Assignment {
        self.outboxes.subscribe(conn, outbox);

        let assignment = self.registry.assign_role(conn);
        let greeting = match assignment {
            Assignment::Player { role, color } => {
                ServerMessage::RoleAssigned { role, color }
            }
            Assignment::Spectator => ServerMessage::SpectatorAssigned,
        };
        self.outboxes.send_to(conn, greeting);
        self.send_full_state(conn);

        tracing::info!(
            %conn,
            ?assignment,
            connections = self.outboxes.len(),
            "connection joined"
        );
        assignment
    }

    /// A connection left: free its seat. Nothing is broadcast; the others
    /// keep the last state they saw and the seat waits for the next joiner.
    pub fn on_disconnect(&mut self, conn: ConnectionId) {
        self.outboxes.unsubscribe(conn);
        let released = self.registry.release_role(conn);
        tracing::info!(
            %conn,
            ?released,
            connections = self.outboxes.len(),
            "connection left"
        );
    }

    // -----------------------------------------------------------------
    // Client requests
    // -----------------------------------------------------------------

    /// Dispatches one decoded client message.
    pub fn handle(&mut self, conn: ConnectionId, msg: ClientMessage) {
        match msg {
            ClientMessage::MoveRequest { from, to } => {
                self.submit_move(MoveIntent {
                    requester: conn,
                    from,
                    to,
                });
            }
            ClientMessage::RequestResync => self.send_full_state(conn),
            ClientMessage::RequestReset => self.reset(conn),
        }
    }

    /// Runs `intent` through the gate and applies it if accepted.
    ///
    /// A rejection reaches only the requester and leaves everything else
    /// untouched.
    pub fn submit_move(&mut self, intent: MoveIntent) -> Decision {
        let decision = authorize(&self.registry, &self.engine, &intent);
        match decision {
            Decision::Accepted(mv) => {
                self.apply_and_broadcast(intent.requester, mv);
            }
            Decision::Rejected(reason) => {
                tracing::debug!(
                    conn = %intent.requester,
                    from = %intent.from,
                    to = %intent.to,
                    ?reason,
                    "move rejected"
                );
                self.outboxes
                    .send_to(intent.requester, ServerMessage::MoveRejected { reason });
            }
        }
        decision
    }

    /// Tells `conn` its request was refused without touching the game.
    pub fn reject(&self, conn: ConnectionId, reason: RejectReason) {
        tracing::debug!(%conn, ?reason, "request rejected");
        self.outboxes
            .send_to(conn, ServerMessage::MoveRejected { reason });
    }

    /// Commits an authorized move and tells everyone.
    ///
    /// If the engine fails to apply a move it just validated, the position
    /// is restored from the snapshot taken before the attempt, the
    /// requester gets a rejection followed by a full snapshot, and nothing
    /// is broadcast.
    pub fn apply_and_broadcast(&mut self, requester: ConnectionId, mv: ResolvedMove) {
        let before = self.engine.dump();

        let failure = match catch_unwind(AssertUnwindSafe(|| self.engine.apply_move(&mv))) {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some("engine panicked".to_string()),
        };

        if let Some(error) = failure {
            tracing::error!(
                conn = %requester,
                from = %mv.from,
                to = %mv.to,
                %error,
                "engine failed to apply an authorized move, restoring position"
            );
            if let Err(e) = self.engine.load(&before) {
                tracing::error!(error = %e, fen = %before, "position restore failed");
            }
            self.outboxes.send_to(
                requester,
                ServerMessage::MoveRejected {
                    reason: RejectReason::IllegalMove,
                },
            );
            self.send_full_state(requester);
            return;
        }

        let fen = self.engine.dump();
        let turn = self.engine.side_to_move();
        tracing::info!(
            conn = %requester,
            from = %mv.from,
            to = %mv.to,
            %fen,
            "move applied"
        );
        self.outboxes.broadcast(&ServerMessage::MoveApplied {
            from: mv.from,
            to: mv.to,
            fen,
            turn,
        });

        if let Some(outcome) = self.engine.terminal() {
            tracing::info!(%outcome, "game over");
            self.outboxes.broadcast(&ServerMessage::GameOver { outcome });
        }
    }

    /// Pushes the complete position to one connection.
    pub fn send_full_state(&self, conn: ConnectionId) {
        self.outboxes.send_to(
            conn,
            ServerMessage::StateSnapshot {
                fen: self.engine.dump(),
            },
        );
    }

    /// Restarts the game if `requester` holds a seat.
    ///
    /// Spectators are ignored without a reply. Seats are kept; only the
    /// position returns to the start.
    pub fn reset(&mut self, requester: ConnectionId) {
        if !self.registry.role_of(requester).is_player() {
            tracing::debug!(conn = %requester, "reset ignored, not a player");
            return;
        }

        self.engine.reset();
        let fen = self.engine.dump();
        tracing::info!(conn = %requester, %fen, "game reset");
        self.outboxes.broadcast(&ServerMessage::StateSnapshot { fen });
        self.outboxes.broadcast(&ServerMessage::GameReset);
    }
}
