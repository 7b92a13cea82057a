//! Room configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a room instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Capacity of the actor's command channel. Connection tasks wait
    /// when it is full.
    pub channel_size: usize,

    /// FEN the game starts from and returns to on reset. `None` means the
    /// standard initial position.
    pub start_position: Option<String>,
}

impl RoomConfig {
    /// The start position as FEN, falling back to the standard one.
    pub fn start_fen(&self) -> &str {
        self.start_position
            .as_deref()
            .unwrap_or(gambit_rules::STANDARD_START)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            start_position: None,
        }
    }
}
