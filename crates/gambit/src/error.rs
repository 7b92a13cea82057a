//! Unified error type for the Gambit server.

use gambit_protocol::ProtocolError;
use gambit_room::RoomError;
use gambit_rules::RulesError;
use gambit_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `gambit` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates `From` impls, so `?` converts
/// sub-crate errors automatically.
///
/// Move rejections never show up here: they are protocol events sent to
/// the requester, not failures of the server.
#[derive(Debug, thiserror::Error)]
pub enum GambitError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The room actor is gone or could not be started.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The rules engine refused a position.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// A configuration value could not be understood.
    #[error("invalid configuration: {0}")]
    Config(String),
}
