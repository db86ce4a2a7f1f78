//! Error types for the advisor client.

use twenty48_protocol::{AdvisorMode, ProtocolError};
use twenty48_transport::TransportError;

/// Why the advisor couldn't produce advice.
///
/// None of these are fatal to a game. [`Advisor::advise`](crate::Advisor::advise)
/// logs them and reports "no suggestion".
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// The service was unreachable, slow, or answered with a non-2xx status.
    #[error("advisor transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The request couldn't be built or the response couldn't be decoded.
    #[error("advisor protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Coaching needs the move the player just made, and there wasn't one.
    #[error("coaching needs a player move")]
    MissingPlayerMove,

    /// The response decoded but carried nothing usable for this mode.
    #[error("advisor had no suggestion in {0} mode")]
    NoSuggestion(AdvisorMode),
}
