//! The game session: one player's board, score, and turn loop.
//!
//! A [`GameSession`] owns its grid outright. The engine only ever sees a
//! borrowed view and hands back a new grid; the session decides whether to
//! commit it, spawns the follow-up tile, and checks for the end of the game.
//!
//! ```text
//! direction ──→ apply_move (pure) ──changed?──→ commit ──→ spawn ──→ terminal?
//!                                      │
//!                                      └─ no: nothing happens
//! ```

use twenty48_engine::{Direction, Grid, Position, TileSource, apply_move, is_terminal, spawn_tile};
use twenty48_protocol::{BoardSnapshot, SessionId, TurnReport};

use crate::{SessionError, SessionState};

/// One game of 2048.
///
/// Generic over its [`TileSource`] so tests can script every spawn and the
/// server can seed a real generator.
#[derive(Debug)]
pub struct GameSession<S> {
    id: SessionId,
    state: SessionState,
    grid: Grid,
    score: u64,
    turn: u64,
    tiles: S,
}

impl<S: TileSource> GameSession<S> {
    /// Creates a session in [`SessionState::Initializing`] with an empty board.
    ///
    /// Call [`start`](Self::start) to deal the first two tiles.
    pub fn new(id: SessionId, tiles: S) -> Self {
        Self {
            id,
            state: SessionState::Initializing,
            grid: Grid::EMPTY,
            score: 0,
            turn: 0,
            tiles,
        }
    }

    /// Resumes a game from a saved board and score.
    ///
    /// The session comes back as `Playing`, or straight to `Over` when the
    /// board has no legal move left.
    pub fn resume(id: SessionId, grid: Grid, score: u64, tiles: S) -> Self {
        let state = if is_terminal(&grid) {
            SessionState::Over
        } else {
            SessionState::Playing
        };
        Self {
            id,
            state,
            grid,
            score,
            turn: 1,
            tiles,
        }
    }

    /// Deals a fresh game: empty board, score 0, two spawned tiles.
    ///
    /// Works from any state, so it doubles as the body of [`reset`](Self::reset).
    pub fn start(&mut self) -> BoardSnapshot {
        self.grid = Grid::EMPTY;
        self.score = 0;
        spawn_tile(&mut self.grid, &mut self.tiles);
        spawn_tile(&mut self.grid, &mut self.tiles);
        self.state = SessionState::Playing;
        self.turn += 1;

        tracing::info!(session_id = %self.id, turn = self.turn, "game started");
        self.snapshot()
    }

    /// Throws the current game away and deals a new one.
    pub fn reset(&mut self) -> BoardSnapshot {
        tracing::debug!(session_id = %self.id, from = %self.state, "resetting game");
        self.state = SessionState::Initializing;
        self.start()
    }

    /// Plays one move.
    ///
    /// A move that changes nothing is not an error: the report comes back
    /// with `changed == false` and the session is left exactly as it was
    /// (no spawn, no terminal check, same turn number).
    ///
    /// # Errors
    /// - [`SessionError::NotStarted`] before [`start`](Self::start)
    /// - [`SessionError::GameOver`] once the game has ended
    pub fn apply_direction(&mut self, direction: Direction) -> Result<TurnReport, SessionError> {
        match self.state {
            SessionState::Initializing => return Err(SessionError::NotStarted),
            SessionState::Over => return Err(SessionError::GameOver),
            SessionState::Playing => {}
        }

        let mut outcome = apply_move(&self.grid, direction);
        if !outcome.changed {
            tracing::trace!(session_id = %self.id, %direction, "move changed nothing");
            return Ok(self.report(direction, 0, Vec::new(), Vec::new(), false));
        }

        self.grid = outcome.grid;
        self.score += outcome.score_delta;
        if let Some(pos) = spawn_tile(&mut self.grid, &mut self.tiles) {
            outcome.new_cells.push(pos);
        }
        self.turn += 1;

        if is_terminal(&self.grid) {
            self.state = SessionState::Over;
            tracing::info!(
                session_id = %self.id,
                score = self.score,
                highest = self.grid.highest_tile(),
                "game over"
            );
        }

        tracing::trace!(
            session_id = %self.id,
            %direction,
            turn = self.turn,
            delta = outcome.score_delta,
            "move applied"
        );
        Ok(self.report(
            direction,
            outcome.score_delta,
            outcome.merged_cells,
            outcome.new_cells,
            true,
        ))
    }

    /// A read-only view of the session for clients and the advisor.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            session_id: self.id,
            turn: self.turn,
            grid: self.grid,
            score: self.score,
            over: self.state.is_over(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Bumped on start, reset, and every move that changed the board.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    fn report(
        &self,
        direction: Direction,
        score_delta: u64,
        merged_cells: Vec<Position>,
        new_cells: Vec<Position>,
        changed: bool,
    ) -> TurnReport {
        TurnReport {
            turn: self.turn,
            direction,
            grid: self.grid,
            score: self.score,
            score_delta,
            merged_cells,
            new_cells,
            changed,
            over: self.state.is_over(),
        }
    }
}
