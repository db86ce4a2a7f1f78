//! Error types for the protocol layer.
//!
//! Each crate in twenty48 defines its own error enum. A `ProtocolError`
//! always means the bytes or the message shape were wrong, never the
//! network or the game rules.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, a board that
    /// is not 4x4, or a direction name the engine doesn't know.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// An advisor request asked for a search depth below 1.
    #[error("invalid search depth {0}: must be at least 1")]
    InvalidDepth(u32),

    /// The message decoded fine but breaks a protocol rule.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
