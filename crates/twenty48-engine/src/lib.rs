//! Board transition engine for twenty48.
//!
//! This crate is the rules of the game and nothing else. It has no I/O, no
//! clock and no global state:
//!
//! - [`Grid`]: the 4x4 board of power-of-two tiles
//! - [`apply_move`]: slide and merge in one [`Direction`], returning a
//!   [`MoveResult`] (new grid, score delta, merged cells, changed flag)
//! - [`spawn_tile`]: drop a 2 or 4 into an empty cell, drawing randomness
//!   from an injected [`TileSource`]
//! - [`is_terminal`]: whether any legal move remains
//!
//! # Example
//!
//! ```rust
//! use twenty48_engine::{apply_move, Direction, Grid, Position};
//!
//! let grid = Grid::from_rows([
//!     [2, 2, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//! ]).unwrap();
//!
//! let result = apply_move(&grid, Direction::Left);
//! assert!(result.changed);
//! assert_eq!(result.score_delta, 4);
//! assert_eq!(result.merged_cells, vec![Position::new(0, 0)]);
//! ```

mod direction;
mod error;
mod grid;
mod spawn;
mod terminal;
mod transform;
mod transition;

pub use direction::Direction;
pub use error::EngineError;
pub use grid::{Grid, MAX_TILE, Position, SIZE, Tile};
pub use spawn::{FOUR_PROBABILITY, RngTiles, ScriptedTiles, TileSource, spawn_tile};
pub use terminal::is_terminal;
pub use transform::Transform;
pub use transition::{MoveResult, RowOutcome, apply_move, compact_row_left, legal_moves};
