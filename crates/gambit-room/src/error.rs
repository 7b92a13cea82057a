//! Error types for the room layer.

use gambit_rules::RulesError;

/// Errors that can occur while creating or talking to a room.
///
/// Move rejections are not errors: they are ordinary
/// [`Decision`](crate::Decision) values delivered to the requester.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room actor has stopped; its command channel is closed.
    #[error("room is unavailable")]
    Unavailable,

    /// The rules engine could not be set up (bad start position).
    #[error(transparent)]
    Rules(#[from] RulesError),
}
