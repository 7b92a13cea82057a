//! Transport abstraction layer for Gambit.
//!
//! Provides the [`Transport`] trait for accepting connections and the
//! [`FrameSink`] / [`FrameStream`] pair every accepted connection splits
//! into. Splitting matters for a shared game table: the room pushes
//! broadcasts through the sink while a separate task sits in `recv` on the
//! stream, and neither blocks the other.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{
    WebSocketConnection, WebSocketSink, WebSocketStream, WebSocketTransport,
};

use std::fmt;
use std::net::SocketAddr;

/// Opaque identifier for a connection.
///
/// Stable for the life of the underlying transport session and never
/// reused within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Returns the address the transport is listening on.
    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// A freshly accepted connection, not yet split into its two halves.
pub trait Connection: Send + 'static {
    /// The outbound half.
    type Sink: FrameSink;
    /// The inbound half.
    type Stream: FrameStream;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;

    /// Splits the connection into independently owned send/receive halves.
    fn split(self) -> (Self::Sink, Self::Stream);
}

/// The sending half of a connection.
pub trait FrameSink: Send + 'static {
    /// The error type for send operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one text frame to the remote peer.
    async fn send_text(&mut self, text: String) -> Result<(), Self::Error>;

    /// Closes the connection from our side.
    async fn close(&mut self) -> Result<(), Self::Error>;
}

/// The receiving half of a connection.
pub trait FrameStream: Send + 'static {
    /// The error type for receive operations.
    type Error: std::error::Error + Send + Sync;

    /// Receives the payload of the next data frame.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed. Control
    /// frames (ping, pong) never surface here.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;
}
