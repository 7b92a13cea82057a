//! Error types for the protocol layer.
//!
//! Each crate in Gambit defines its own error enum. A `ProtocolError` always
//! means the problem is in turning messages into bytes or back, never in
//! networking or game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into text).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing tag, or an
    /// unknown message type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A square name that is not a file `a`–`h` followed by a rank `1`–`8`.
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
}
