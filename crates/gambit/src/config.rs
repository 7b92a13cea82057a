//! Server configuration.

use gambit_room::RoomConfig;
use serde::{Deserialize, Serialize};

use crate::GambitError;

/// Port used when neither `GAMBIT_BIND` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Settings for the single game room.
    pub room: RoomConfig,
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    ///
    /// | Variable | Effect |
    /// |---|---|
    /// | `GAMBIT_BIND` | full socket address, e.g. `127.0.0.1:9000` |
    /// | `PORT` | binds `0.0.0.0:$PORT` when `GAMBIT_BIND` is unset |
    /// | `GAMBIT_START_FEN` | start position of the room |
    ///
    /// # Errors
    /// [`GambitError::Config`] if `PORT` is not a port number.
    pub fn from_env() -> Result<Self, GambitError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, GambitError> {
        let bind_addr = match (lookup("GAMBIT_BIND"), lookup("PORT")) {
            (Some(addr), _) => addr,
            (None, Some(port)) => {
                let port: u16 = port.trim().parse().map_err(|_| {
                    GambitError::Config(format!("PORT is not a port number: {port:?}"))
                })?;
                format!("0.0.0.0:{port}")
            }
            (None, None) => format!("0.0.0.0:{DEFAULT_PORT}"),
        };

        let room = RoomConfig {
            start_position: lookup("GAMBIT_START_FEN"),
            ..RoomConfig::default()
        };

        Ok(Self { bind_addr, room })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("127.0.0.1:{DEFAULT_PORT}"),
            room: RoomConfig::default(),
        }
    }
}
