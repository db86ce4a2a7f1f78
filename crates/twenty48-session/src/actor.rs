//! Session actor: an isolated Tokio task that owns one game.
//!
//! Everything that touches a session's board goes through its command
//! channel, so turns are processed strictly one at a time, in arrival
//! order, with no locks around the game state. Callers talk to the actor
//! through a cheap, cloneable [`SessionHandle`].

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use twenty48_engine::{Direction, TileSource};
use twenty48_protocol::{BoardSnapshot, SessionId, TurnReport};

use crate::{GameSession, SessionError, SessionState};

/// Commands sent to a session actor through its channel.
///
/// The `oneshot::Sender` in each variant is the reply channel: the caller
/// queues the command and then waits for the answer on it.
pub(crate) enum SessionCommand {
    /// Play one move.
    Apply {
        direction: Direction,
        reply: oneshot::Sender<Result<TurnReport, SessionError>>,
    },

    /// Start a new game.
    Reset { reply: oneshot::Sender<BoardSnapshot> },

    /// Read the current board.
    Snapshot { reply: oneshot::Sender<BoardSnapshot> },

    /// Stop the actor.
    Shutdown,
}

/// Handle to a running session actor.
///
/// Cloning is cheap: it's an `mpsc::Sender` and an ID.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl std::fmt::Debug for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apply { direction, .. } => write!(f, "Apply({direction})"),
            Self::Reset { .. } => write!(f, "Reset"),
            Self::Snapshot { .. } => write!(f, "Snapshot"),
            Self::Shutdown => write!(f, "Shutdown"),
        }
    }
}

impl SessionHandle {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Plays a move, waiting for queue space if the session is backed up.
    pub async fn apply_direction(&self, direction: Direction) -> Result<TurnReport, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Apply {
                direction,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?
    }

    /// Plays a move unless the session's queue is full.
    ///
    /// Interactive input uses this: a player mashing keys faster than turns
    /// resolve gets [`SessionError::Busy`] for the overflow instead of an
    /// ever-growing backlog.
    pub async fn try_apply_direction(
        &self,
        direction: Direction,
    ) -> Result<TurnReport, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .try_send(SessionCommand::Apply {
                direction,
                reply: reply_tx,
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => SessionError::Busy(self.session_id),
                TrySendError::Closed(_) => SessionError::Unavailable(self.session_id),
            })?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?
    }

    /// Starts a new game and returns its first board.
    pub async fn reset(&self) -> Result<BoardSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Reset { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    /// Returns the current board.
    pub async fn snapshot(&self) -> Result<BoardSnapshot, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    /// Tells the actor to stop. Commands already queued ahead of this one
    /// are still answered.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| SessionError::Unavailable(self.session_id))
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct SessionActor<S> {
    game: GameSession<S>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<S: TileSource> SessionActor<S> {
    async fn run(mut self) {
        let session_id = self.game.id();
        tracing::debug!(%session_id, "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Apply { direction, reply } => {
                    let result = self.game.apply_direction(direction);
                    if let Err(e) = &result {
                        tracing::debug!(%session_id, %direction, error = %e, "move rejected");
                    }
                    let _ = reply.send(result);
                }
                SessionCommand::Reset { reply } => {
                    let _ = reply.send(self.game.reset());
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.game.snapshot());
                }
                SessionCommand::Shutdown => {
                    tracing::debug!(%session_id, "session shutting down");
                    break;
                }
            }
        }

        tracing::info!(
            %session_id,
            score = self.game.score(),
            turn = self.game.turn(),
            "session actor stopped"
        );
    }
}

/// Spawns an actor for `game` and returns a handle to it.
///
/// A game that hasn't been dealt yet is started before the first command
/// is taken. `capacity` bounds the command queue and must be non-zero.
pub(crate) fn spawn_session<S>(mut game: GameSession<S>, capacity: usize) -> SessionHandle
where
    S: TileSource + Send + 'static,
{
    if game.state() == SessionState::Initializing {
        game.start();
    }
    let session_id = game.id();
    let (tx, rx) = mpsc::channel(capacity);

    let actor = SessionActor { game, receiver: rx };
    tokio::spawn(actor.run());

    SessionHandle {
        session_id,
        sender: tx,
    }
}
