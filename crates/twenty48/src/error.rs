//! Unified error type for twenty48.

use twenty48_advisor::AdvisorError;
use twenty48_engine::EngineError;
use twenty48_protocol::ProtocolError;
use twenty48_session::SessionError;
use twenty48_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `twenty48` crate you deal with this single error type
/// instead of importing errors from each layer. The `#[from]` attribute on
/// each variant generates the `From` impl, so `?` converts automatically.
#[derive(Debug, thiserror::Error)]
pub enum Twenty48Error {
    /// A rules-level error (bad direction, bad board).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A transport-level error (bind, connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A session-level error (not started, game over, session gone).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The advisor failed. Only surfaces from direct advisor calls; the
    /// server itself reports these to clients as "advisor unavailable".
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
}
