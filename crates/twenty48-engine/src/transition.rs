//! The transition engine: slide and merge tiles in one direction.
//!
//! Only one move is actually implemented, [`compact_row_left`]. Every
//! direction is turned into a left-move by a [`Transform`](crate::Transform),
//! compacted row by row, and turned back with the inverse transform.
//!
//! ```text
//!   up:    rotate ccw ─→ compact rows left ─→ rotate cw
//!   down:  rotate cw  ─→ compact rows left ─→ rotate ccw
//!   right: mirror     ─→ compact rows left ─→ mirror
//!   left:               compact rows left
//! ```
//!
//! Everything here is pure. [`apply_move`] takes the grid by reference and
//! returns a new one.

use crate::grid::{Grid, Position, SIZE, Tile, merges_with};
use crate::Direction;

/// The result of compacting one row toward index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOutcome {
    /// The compacted row, right-padded with zeros.
    pub tiles: [Tile; SIZE],
    /// `merged[i]` is set when `tiles[i]` was produced by a merge.
    pub merged: [bool; SIZE],
    /// Sum of the values produced by merges in this row.
    pub score: u64,
}

/// Slides a row to the left, merging equal neighbours once.
///
/// Zeros are dropped first, then the remaining tiles are scanned left to
/// right. Two equal tiles combine into one of double value and the scan
/// skips past both, so a freshly merged tile never merges again in the
/// same move: `[2, 2, 2, 2]` becomes `[4, 4, 0, 0]`, not `[8, 0, 0, 0]`.
/// Tiles already at [`MAX_TILE`](crate::MAX_TILE) stay as they are.
pub fn compact_row_left(row: [Tile; SIZE]) -> RowOutcome {
    let mut filtered = [0; SIZE];
    let mut len = 0;
    for tile in row {
        if tile != 0 {
            filtered[len] = tile;
            len += 1;
        }
    }

    let mut out = RowOutcome {
        tiles: [0; SIZE],
        merged: [false; SIZE],
        score: 0,
    };

    let mut i = 0;
    let mut next = 0;
    while i < len {
        if i + 1 < len && merges_with(filtered[i], filtered[i + 1]) {
            let value = filtered[i] * 2;
            out.tiles[next] = value;
            out.merged[next] = true;
            out.score += u64::from(value);
            i += 2;
        } else {
            out.tiles[next] = filtered[i];
            i += 1;
        }
        next += 1;
    }

    out
}

/// What a single move did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The board after sliding and merging, before any spawn.
    pub grid: Grid,
    /// Sum of all merged tile values.
    pub score_delta: u64,
    /// Cells in `grid` that hold a tile produced by a merge.
    pub merged_cells: Vec<Position>,
    /// Cells filled by spawning after the move.
    ///
    /// Always empty when returned from [`apply_move`]; the game session
    /// records its spawn here.
    pub new_cells: Vec<Position>,
    /// Whether `grid` differs from the input in any cell.
    pub changed: bool,
}

/// A tile travelling through the transforms together with its merge flag.
#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    value: Tile,
    merged: bool,
}

/// Applies a move to `grid` and returns the outcome. Never mutates `grid`.
pub fn apply_move(grid: &Grid, direction: Direction) -> MoveResult {
    let (pre, post) = direction.transforms();
    let oriented = pre.apply(grid.rows());

    let mut compacted = [[Cell::default(); SIZE]; SIZE];
    let mut score_delta = 0;
    for (row, out) in oriented.iter().zip(compacted.iter_mut()) {
        let outcome = compact_row_left(*row);
        score_delta += outcome.score;
        for (i, cell) in out.iter_mut().enumerate() {
            *cell = Cell {
                value: outcome.tiles[i],
                merged: outcome.merged[i],
            };
        }
    }

    // Merge flags ride through the inverse transform with their tiles, so
    // positions come out in board coordinates.
    let restored = post.apply(&compacted);

    let mut tiles = [[0; SIZE]; SIZE];
    let mut merged_cells = Vec::new();
    for (r, row) in restored.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            tiles[r][c] = cell.value;
            if cell.merged {
                merged_cells.push(Position::new(r, c));
            }
        }
    }

    let next = Grid::from_cells(tiles);
    MoveResult {
        changed: next != *grid,
        grid: next,
        score_delta,
        merged_cells,
        new_cells: Vec::new(),
    }
}

/// Directions that would change the board, in [`Direction::ALL`] order.
pub fn legal_moves(grid: &Grid) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&dir| apply_move(grid, dir).changed)
        .collect()
}
