//! Per-connection handler: one player, one game session.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Create a session and send its first `Board`
//!   2. Loop: receive envelopes → dispatch client messages
//!   3. Meanwhile, forward advice produced by background advisor calls
//!   4. On exit, the session is shut down and forgotten

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use twenty48_engine::Direction;
use twenty48_protocol::{AdvisorMode, ClientMessage, Codec, Envelope, ServerMessage, SessionId};
use twenty48_session::{SessionError, SessionHandle};
use twenty48_transport::WsConnection;

use crate::Twenty48Error;
use crate::server::ServerState;

/// Drop guard that removes the player's session when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct SessionGuard<C: Codec> {
    session_id: SessionId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        let session_id = self.session_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut sessions = state.sessions.lock().await;
            let _ = sessions.remove(session_id).await;
        });
    }
}

/// Per-connection settings the player can change.
struct PlayerState {
    mode: AdvisorMode,
    /// The move that produced the current board, for coaching.
    last_move: Option<Direction>,
}

/// Whether the message loop should keep going.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

/// Wraps outgoing messages in envelopes and sends them.
///
/// Also remembers the turn of the last board the client was shown, so
/// advice for an older board can be held back.
struct Outbox<'a, C: Codec> {
    conn: &'a WsConnection,
    codec: &'a C,
    seq: u64,
    start: Instant,
    shown_turn: u64,
}

impl<'a, C: Codec> Outbox<'a, C> {
    fn new(conn: &'a WsConnection, codec: &'a C) -> Self {
        Self {
            conn,
            codec,
            seq: 0,
            start: Instant::now(),
            shown_turn: 0,
        }
    }

    async fn send(&mut self, message: ServerMessage) -> Result<(), Twenty48Error> {
        if let Some(turn) = board_turn(&message) {
            self.shown_turn = turn;
        }
        let envelope = Envelope::new(self.seq, self.start.elapsed().as_millis() as u64, message);
        self.seq += 1;
        let bytes = self.codec.encode(&envelope)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }

    async fn error(&mut self, code: u16, message: &str) -> Result<(), Twenty48Error> {
        self.send(ServerMessage::Error {
            code,
            message: message.to_string(),
        })
        .await
    }
}

/// The turn of the board a message shows the client, if it shows one.
fn board_turn(message: &ServerMessage) -> Option<u64> {
    match message {
        ServerMessage::Board { snapshot } => Some(snapshot.turn),
        ServerMessage::Turn { report } => Some(report.turn),
        _ => None,
    }
}

/// True for advice computed for a board other than the one at `shown_turn`.
fn is_stale(message: &ServerMessage, shown_turn: u64) -> bool {
    matches!(message, ServerMessage::Advice { advice } if !advice.is_current(shown_turn))
}

/// The status code sent to the client for a session error.
fn error_code(err: &SessionError) -> u16 {
    match err {
        SessionError::Engine(_) => 400,
        SessionError::NotStarted | SessionError::GameOver => 409,
        SessionError::Busy(_) => 429,
        SessionError::NotFound(_) | SessionError::Unavailable(_) => 503,
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WsConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), Twenty48Error> {
    let conn_id = conn.id();

    let session = state.sessions.lock().await.create();
    let session_id = session.session_id();
    let _guard = SessionGuard {
        session_id,
        state: Arc::clone(&state),
    };
    tracing::info!(%conn_id, peer = %conn.peer_addr(), %session_id, "player connected");

    let mut out = Outbox::new(&conn, &state.codec);
    let mut player = PlayerState {
        mode: state.default_mode,
        last_move: None,
    };
    // Advisor calls run in their own tasks and report back through here.
    let (advice_tx, mut advice_rx) = mpsc::unbounded_channel::<ServerMessage>();

    out.send(ServerMessage::Board {
        snapshot: session.snapshot().await?,
    })
    .await?;

    loop {
        tokio::select! {
            frame = tokio::time::timeout(state.idle_timeout, conn.recv()) => {
                let data = match frame {
                    Ok(Ok(Some(data))) => data,
                    Ok(Ok(None)) => {
                        tracing::info!(%session_id, "connection closed cleanly");
                        break;
                    }
                    Ok(Err(e)) => {
                        tracing::debug!(%session_id, error = %e, "recv error");
                        break;
                    }
                    Err(_) => {
                        tracing::info!(%session_id, "connection timed out");
                        break;
                    }
                };

                let envelope: Envelope<ClientMessage> = match state.codec.decode(&data) {
                    Ok(env) => env,
                    Err(e) => {
                        tracing::debug!(%session_id, error = %e, "failed to decode envelope");
                        out.error(400, &format!("invalid message: {e}")).await?;
                        continue;
                    }
                };

                let flow = handle_message(
                    &state, &session, &mut out, &mut player, &advice_tx, envelope.message,
                )
                .await;
                match flow {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Close) => break,
                    Err(Twenty48Error::Session(e)) => {
                        out.error(error_code(&e), &e.to_string()).await?;
                        return Err(e.into());
                    }
                    Err(e) => return Err(e),
                }
            }
            Some(message) = advice_rx.recv() => {
                // A move may have been answered since the advice was queued.
                if is_stale(&message, out.shown_turn) {
                    tracing::debug!(%session_id, shown_turn = out.shown_turn, "discarding stale advice");
                    continue;
                }
                out.send(message).await?;
            }
        }
    }

    let _ = conn.close().await;
    // _guard drops here → session removal fires.
    Ok(())
}

/// Handles one client message.
async fn handle_message<C: Codec>(
    state: &ServerState<C>,
    session: &SessionHandle,
    out: &mut Outbox<'_, C>,
    player: &mut PlayerState,
    advice_tx: &mpsc::UnboundedSender<ServerMessage>,
    msg: ClientMessage,
) -> Result<Flow, Twenty48Error> {
    let session_id = session.session_id();

    match msg {
        ClientMessage::GetBoard => {
            let snapshot = session.snapshot().await?;
            out.send(ServerMessage::Board { snapshot }).await?;
        }

        ClientMessage::Move { direction } => {
            let direction: Direction = match direction.parse() {
                Ok(d) => d,
                Err(e) => {
                    tracing::debug!(%session_id, error = %e, "rejected move");
                    out.error(400, &e.to_string()).await?;
                    return Ok(Flow::Continue);
                }
            };

            match session.try_apply_direction(direction).await {
                Ok(report) => {
                    let changed = report.changed;
                    out.send(ServerMessage::Turn { report }).await?;
                    if changed {
                        player.last_move = Some(direction);
                        if player.mode == AdvisorMode::Coach {
                            request_advice(state, session, player, advice_tx).await?;
                        }
                    }
                }
                Err(e) => {
                    let code = error_code(&e);
                    out.error(code, &e.to_string()).await?;
                    if code == 503 {
                        return Ok(Flow::Close);
                    }
                }
            }
        }

        ClientMessage::Reset => {
            let snapshot = session.reset().await?;
            player.last_move = None;
            out.send(ServerMessage::Board { snapshot }).await?;
        }

        ClientMessage::SetMode { mode } => {
            tracing::debug!(%session_id, %mode, "advisor mode changed");
            player.mode = mode;
            out.send(ServerMessage::ModeChanged { mode }).await?;
        }

        ClientMessage::Advise => {
            request_advice(state, session, player, advice_tx).await?;
        }

        ClientMessage::Disconnect { reason } => {
            tracing::info!(%session_id, %reason, "client disconnected");
            return Ok(Flow::Close);
        }
    }

    Ok(Flow::Continue)
}

/// Starts an advisor call for the session's current board.
///
/// The call runs in its own task so a slow advisor never holds up the next
/// move. Its result comes back through `advice_tx`: an `Advice` if the
/// board hasn't changed in the meantime, or `AdvisorUnavailable` if the
/// advisor couldn't help. Advice for a board the player has already moved
/// past is dropped here, and again by the connection loop for moves
/// answered while the advice sat in the channel.
async fn request_advice<C: Codec>(
    state: &ServerState<C>,
    session: &SessionHandle,
    player: &PlayerState,
    advice_tx: &mpsc::UnboundedSender<ServerMessage>,
) -> Result<(), Twenty48Error> {
    let snapshot = session.snapshot().await?;
    let Some(advisor) = state.advisor.clone() else {
        let _ = advice_tx.send(ServerMessage::AdvisorUnavailable {
            turn: snapshot.turn,
        });
        return Ok(());
    };

    let (mode, last_move) = (player.mode, player.last_move);
    let session = session.clone();
    let advice_tx = advice_tx.clone();
    tokio::spawn(async move {
        let message = match advisor.advise(mode, &snapshot, last_move).await {
            Some(advice) => match session.snapshot().await {
                Ok(now) if advice.is_current(now.turn) => ServerMessage::Advice { advice },
                Ok(now) => {
                    tracing::debug!(
                        session_id = %snapshot.session_id,
                        advice_turn = advice.turn,
                        current_turn = now.turn,
                        "discarding stale advice"
                    );
                    return;
                }
                Err(_) => return,
            },
            None => ServerMessage::AdvisorUnavailable {
                turn: snapshot.turn,
            },
        };
        let _ = advice_tx.send(message);
    });
    Ok(())
}
