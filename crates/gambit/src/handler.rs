//! Per-connection handler: join, message routing, and leave.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Split the socket; spawn a writer task draining the connection's
//!      outbox into the sink
//!   2. Join the room → role (or spectator notice) and snapshot are queued
//!   3. Loop: receive frames → decode → hand to the room
//!   4. On close or error, leave the room (via a drop guard)

use std::sync::Arc;

use gambit_protocol::{ClientMessage, Codec, RejectReason, ServerMessage};
use gambit_room::RoomHandle;
use gambit_transport::{
    Connection, ConnectionId, FrameSink, FrameStream, WebSocketConnection,
    WebSocketSink,
};
use tokio::sync::mpsc;

use crate::GambitError;
use crate::server::ServerState;

/// Drop guard that removes the connection from the room when the handler
/// exits.
///
/// This ensures the seat is freed even if the handler returns early with
/// an error or panics. Since `Drop` is synchronous, we spawn a
/// fire-and-forget task to send the command.
struct DisconnectGuard {
    conn_id: ConnectionId,
    room: RoomHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let room = self.room.clone();
        tokio::spawn(async move {
            if room.disconnect(conn_id).await.is_err() {
                tracing::debug!(%conn_id, "room already gone at disconnect");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), GambitError> {
    let conn_id = conn.id();
    let peer = conn.peer_addr();
    tracing::debug!(%conn_id, %peer, "handling new connection");

    let (sink, mut stream) = conn.split();
    let (outbox, inbox) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_loop(conn_id, sink, inbox, Arc::clone(&state)));

    // --- Step 1: Join ---
    let assignment = state.room.connect(conn_id, outbox).await?;
    let guard = DisconnectGuard {
        conn_id,
        room: state.room.clone(),
    };
    tracing::info!(%conn_id, %peer, ?assignment, "connection joined room");

    // --- Step 2: Message loop ---
    loop {
        let data = match stream.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        match state.codec.decode::<ClientMessage>(&data) {
            Ok(msg) => state.room.submit(conn_id, msg).await?,
            Err(e) => {
                // Whatever the client meant, it was not a move we can play.
                tracing::debug!(%conn_id, error = %e, "undecodable frame");
                state.room.reject(conn_id, RejectReason::IllegalMove).await?;
            }
        }
    }

    // The room holds the only outbox; the writer stops once the guard's
    // disconnect is processed.
    drop(guard);
    let _ = writer.await;
    Ok(())
}

/// Drains the connection's outbox into the socket, one text frame per
/// message, in the order the room produced them.
async fn write_loop<C: Codec>(
    conn_id: ConnectionId,
    mut sink: WebSocketSink,
    mut inbox: mpsc::UnboundedReceiver<ServerMessage>,
    state: Arc<ServerState<C>>,
) {
    while let Some(msg) = inbox.recv().await {
        let text = match state.codec.encode(&msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%conn_id, error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = sink.send_text(text).await {
            tracing::debug!(%conn_id, error = %e, "send failed, stopping writer");
            return;
        }
    }
    let _ = sink.close().await;
}
