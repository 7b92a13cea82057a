//! Fan-out from the room to connected clients.

use std::collections::HashMap;

use gambit_protocol::ServerMessage;
use gambit_transport::ConnectionId;
use tokio::sync::mpsc;

/// Channel sender for delivering server messages to one connection.
///
/// Unbounded so the room never waits on a slow client while holding the
/// game; each connection task drains its own receiver into the socket.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Every connected party's outbox, players and spectators alike.
///
/// Messages to one connection arrive in the order they were sent here, so
/// a broadcast issued after another is observed after it by everyone.
#[derive(Debug, Default)]
pub struct Broadcaster {
    outboxes: HashMap<ConnectionId, Outbox>,
}

impl Broadcaster {
    /// Creates an empty broadcaster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts delivering to `conn`.
    pub fn subscribe(&mut self, conn: ConnectionId, outbox: Outbox) {
        self.outboxes.insert(conn, outbox);
    }

    /// Stops delivering to `conn`.
    pub fn unsubscribe(&mut self, conn: ConnectionId) {
        self.outboxes.remove(&conn);
    }

    /// Number of connections currently subscribed.
    pub fn len(&self) -> usize {
        self.outboxes.len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.outboxes.is_empty()
    }

    /// Sends to one connection. Silently drops if its receiver is gone;
    /// the disconnect that follows will unsubscribe it.
    pub fn send_to(&self, conn: ConnectionId, msg: ServerMessage) {
        if let Some(outbox) = self.outboxes.get(&conn) {
            if outbox.send(msg).is_err() {
                tracing::trace!(%conn, "outbox closed, dropping message");
            }
        }
    }

    /// Sends to every subscribed connection.
    pub fn broadcast(&self, msg: &ServerMessage) {
        for (conn, outbox) in &self.outboxes {
            if outbox.send(msg.clone()).is_err() {
                tracing::trace!(%conn, "outbox closed, dropping broadcast");
            }
        }
    }
}
