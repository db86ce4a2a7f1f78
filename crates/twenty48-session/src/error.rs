//! Error types for the session layer.

use twenty48_engine::EngineError;
use twenty48_protocol::SessionId;

/// Errors that can occur while driving a game session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The input itself was bad (e.g. an unknown direction name).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A move arrived before the first game was dealt.
    #[error("game has not started")]
    NotStarted,

    /// A move arrived after the game ended. Reset to play again.
    #[error("game is over")]
    GameOver,

    /// No session exists with this ID.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// The session's command queue is full; the input was dropped.
    #[error("session {0} is busy")]
    Busy(SessionId),

    /// The session actor has stopped.
    #[error("session {0} is unavailable")]
    Unavailable(SessionId),
}
