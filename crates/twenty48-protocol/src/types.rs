//! Protocol types for twenty48's two wire formats.
//!
//! Every type here is something that gets serialized, sent to another
//! process, and deserialized on the other side:
//!
//! - the **game protocol** spoken between the server and its clients
//!   ([`Envelope`], [`ClientMessage`], [`ServerMessage`]);
//! - the **advisor contract** spoken with the external move-scoring
//!   service ([`AdvisorRequest`], [`AdvisorResponse`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use twenty48_engine::{Direction, Grid, Position};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a game session.
///
/// Newtype over `u64` so it can't be confused with a turn counter or a
/// sequence number. `#[serde(transparent)]` keeps it a plain number on the
/// wire: `SessionId(7)` is `7`, not `{"0":7}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Advisor mode
// ---------------------------------------------------------------------------

/// Which kind of help the advisor is asked for.
///
/// - **Suggest**: "what should I play next?", answered with a best move.
/// - **Insight**: the same question, but the caller also wants the
///   per-direction scores and the explanation.
/// - **Coach**: retrospective feedback on the move the player just made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorMode {
    #[default]
    Suggest,
    Insight,
    Coach,
}

impl AdvisorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suggest => "suggest",
            Self::Insight => "insight",
            Self::Coach => "coach",
        }
    }
}

impl fmt::Display for AdvisorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvisorMode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "suggest" => Ok(Self::Suggest),
            "insight" => Ok(Self::Insight),
            "coach" => Ok(Self::Coach),
            other => Err(ProtocolError::InvalidMessage(format!(
                "unknown advisor mode {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Advisor contract
// ---------------------------------------------------------------------------

/// The body POSTed to the advisor service.
///
/// ```json
/// { "board": [[2,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,2]], "depth": 2 }
/// ```
///
/// Coaching requests add `"playerMove": "left"`. The field is left out
/// entirely (not sent as `null`) for the other modes.
///
/// Fields are private so the only way to build one is [`AdvisorRequest::new`],
/// which refuses a zero depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdvisorRequest {
    board: Grid,
    depth: u32,
    #[serde(rename = "playerMove", skip_serializing_if = "Option::is_none")]
    player_move: Option<Direction>,
}

impl AdvisorRequest {
    /// Builds a request for `board` searched to `depth` plies.
    ///
    /// # Errors
    /// Returns [`ProtocolError::InvalidDepth`] if `depth` is 0.
    pub fn new(board: Grid, depth: u32) -> Result<Self, ProtocolError> {
        if depth == 0 {
            return Err(ProtocolError::InvalidDepth(depth));
        }
        Ok(Self {
            board,
            depth,
            player_move: None,
        })
    }

    /// Attaches the move the player just made, for coaching feedback.
    pub fn with_player_move(mut self, direction: Direction) -> Self {
        self.player_move = Some(direction);
        self
    }

    pub fn board(&self) -> &Grid {
        &self.board
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn player_move(&self) -> Option<Direction> {
        self.player_move
    }
}

/// One direction and the advisor's score for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub direction: Direction,
    pub score: f64,
}

/// What the advisor service sends back.
///
/// Every field is optional on the wire. A service with no legal move may
/// send `"best_move": null` or leave the key out; both decode to `None`.
/// Directions that would not change the board are usually missing from
/// `scores`.
///
/// `scores` is kept keyed by the raw string so an unexpected key is
/// ignored rather than failing the whole response; use
/// [`AdvisorResponse::scored_moves`] for the typed view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdvisorResponse {
    #[serde(default)]
    pub best_move: Option<Direction>,

    #[serde(default)]
    pub scores: BTreeMap<String, f64>,

    #[serde(default)]
    pub explanation: Option<String>,

    /// Only sent by coaching endpoints.
    #[serde(default)]
    pub coach_msg: Option<String>,
}

impl AdvisorResponse {
    /// The score for one direction, if the advisor reported it.
    pub fn score(&self, direction: Direction) -> Option<f64> {
        self.scores.get(direction.as_str()).copied()
    }

    /// Reported scores in [`Direction::ALL`] order, absent directions skipped.
    pub fn scored_moves(&self) -> Vec<ScoredMove> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                self.score(direction)
                    .map(|score| ScoredMove { direction, score })
            })
            .collect()
    }
}

/// Advice that survived validation, ready to show the player.
///
/// `turn` is the session turn the board snapshot was taken at. A client
/// (or the server) compares it with the current turn and drops advice
/// that has gone stale.
///
/// For suggest and insight modes `best_move` is always set. For coach mode
/// at least one of `coaching` or `best_move` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub turn: u64,
    pub mode: AdvisorMode,
    pub best_move: Option<Direction>,
    #[serde(default)]
    pub scores: Vec<ScoredMove>,
    pub explanation: Option<String>,
    pub coaching: Option<String>,
}

impl Advice {
    /// Whether this advice still applies to a session now at `current_turn`.
    pub fn is_current(&self, current_turn: u64) -> bool {
        self.turn == current_turn
    }
}

// ---------------------------------------------------------------------------
// Game state reports
// ---------------------------------------------------------------------------

/// A read-only view of a session, as sent to clients and to the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub session_id: SessionId,
    /// Bumped on every committed change (start, reset, every changed move).
    pub turn: u64,
    pub grid: Grid,
    pub score: u64,
    pub over: bool,
}

/// Everything a renderer needs after one move.
///
/// Positions are in board coordinates: `merged_cells` are tiles produced by
/// a merge, `new_cells` is the freshly spawned tile (empty when the move
/// changed nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u64,
    pub direction: Direction,
    pub grid: Grid,
    pub score: u64,
    pub score_delta: u64,
    pub merged_cells: Vec<Position>,
    pub new_cells: Vec<Position>,
    pub changed: bool,
    pub over: bool,
}

// ---------------------------------------------------------------------------
// Game messages
// ---------------------------------------------------------------------------

/// Messages a client sends to the game server.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "Move", "direction": "left" }`.
///
/// `direction` is a plain string on purpose: an unknown name still decodes,
/// so the server can answer with a proper "invalid direction" error instead
/// of a generic decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// "Send me the current board."
    GetBoard,

    /// "Slide the board this way."
    Move { direction: String },

    /// "Throw this game away and start a new one."
    Reset,

    /// "Use this kind of advice from now on."
    SetMode { mode: AdvisorMode },

    /// "Ask the advisor about the current board."
    Advise,

    /// "I'm leaving."
    Disconnect { reason: String },
}

/// Messages the game server sends to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Full board state: sent on connect, after `GetBoard`, after `Reset`.
    Board { snapshot: BoardSnapshot },

    /// The outcome of a `Move`.
    Turn { report: TurnReport },

    /// Acknowledges `SetMode`.
    ModeChanged { mode: AdvisorMode },

    /// Advisor output for the board at `advice.turn`.
    Advice { advice: Advice },

    /// The advisor couldn't help with the board at `turn`. Benign; the
    /// client may simply try again.
    AdvisorUnavailable { turn: u64 },

    /// A rejected request. `code` follows HTTP conventions: 400 for a bad
    /// message or direction, 409 for a move the session can't accept in
    /// its current state, 429 when moves arrive faster than they resolve,
    /// 503 when the session is gone.
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The top-level wrapper around every game message on the wire.
///
/// ```text
/// ┌───────────────────────────────┐
/// │ seq: 42                       │  ← per-sender counter
/// │ timestamp: 15000              │  ← ms since the sender started
/// │ ┌───────────────────────────┐ │
/// │ │ message: Move { "left" }  │ │
/// │ └───────────────────────────┘ │
/// └───────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub timestamp: u64,
    pub message: T,
}

impl<T> Envelope<T> {
    pub fn new(seq: u64, timestamp: u64, message: T) -> Self {
        Self {
            seq,
            timestamp,
            message,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
