//! `GambitServer` builder and server loop.
//!
//! This is the entry point for running a Gambit server. It ties together
//! all the layers: transport → protocol → room (gate, rules, broadcast).

use std::sync::Arc;

use gambit_protocol::{Codec, JsonCodec};
use gambit_room::{RoomConfig, RoomHandle, spawn_room};
use gambit_rules::{RulesEngine, ShakmatyEngine};
use gambit_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{GambitError, ServerConfig};

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Nothing in
/// here needs a lock: the room handle is a channel sender and the codec is
/// stateless.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) room: RoomHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Gambit server.
///
/// # Example
///
/// ```rust,no_run
/// use gambit::prelude::*;
///
/// # async fn start() -> Result<(), GambitError> {
/// let server = GambitServer::builder()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GambitServerBuilder {
    config: ServerConfig,
}

impl GambitServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Sets the room configuration.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    /// Binds the listener and starts a standard chess room.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    ///
    /// # Errors
    /// Fails if the configured start position is not valid FEN or the
    /// address cannot be bound.
    pub async fn build(self) -> Result<GambitServer<JsonCodec>, GambitError> {
        let engine = ShakmatyEngine::with_start(self.config.room.start_fen())?;
        self.build_with_engine(engine).await
    }

    /// Binds the listener and starts a room playing on `engine`.
    ///
    /// The room's `start_position` is ignored; `engine` already carries
    /// its own.
    pub async fn build_with_engine<E: RulesEngine>(
        self,
        engine: E,
    ) -> Result<GambitServer<JsonCodec>, GambitError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;
        let room = spawn_room(engine, &self.config.room);

        let state = Arc::new(ServerState {
            room,
            codec: JsonCodec,
        });

        Ok(GambitServer { transport, state })
    }
}

impl Default for GambitServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Gambit server: one listener, one game room.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GambitServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl GambitServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> GambitServerBuilder {
        GambitServerBuilder::new()
    }
}

impl<C: Codec> GambitServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the game room, for observing it from outside.
    pub fn room(&self) -> RoomHandle {
        self.state.room.clone()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. A failed accept
    /// (e.g. a bad WebSocket upgrade) is logged and skipped. Runs until
    /// the process is terminated.
    pub async fn run(mut self) -> Result<(), GambitError> {
        tracing::info!(
            addr = ?self.transport.local_addr().ok(),
            "Gambit server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }
}
