//! # Gambit
//!
//! An authoritative server for one two-player chess game with any number
//! of spectators.
//!
//! The first two connections get the white and black seats; everyone
//! else watches. Clients only ever send *intents* (move, resync, reset).
//! The server checks each intent against who sent it and whose turn it is,
//! lets a real rules engine decide legality, and broadcasts the resulting
//! position to everyone. Clients never hold authority over the game.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gambit::prelude::*;
//!
//! # async fn start() -> Result<(), GambitError> {
//! gambit::init_tracing();
//! let server = GambitServer::builder()
//!     .config(ServerConfig::from_env()?)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::GambitError;
pub use server::{GambitServer, GambitServerBuilder};

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber printing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless; only the first call installs anything.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Everything needed to run a server or talk to one, in one import.
pub mod prelude {
    pub use crate::{GambitError, GambitServer, GambitServerBuilder, ServerConfig};
    pub use gambit_protocol::{
        ClientMessage, Codec, Color, JsonCodec, Outcome, RejectReason, Role,
        ServerMessage, Square,
    };
    pub use gambit_room::{RoomConfig, RoomHandle, RoomInfo};
    pub use gambit_rules::{RulesEngine, STANDARD_START, ShakmatyEngine};
    pub use gambit_session::Assignment;
    pub use gambit_transport::ConnectionId;
}
