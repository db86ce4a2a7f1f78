//! The board: a fixed 4x4 grid of power-of-two tiles.
//!
//! `Grid` is plain storage. It knows how to validate itself and answer a
//! few read-only questions (empty cells, tile sum, highest tile); all move
//! logic lives in [`transition`](crate::transition).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Side length of the board.
pub const SIZE: usize = 4;

/// A single cell value. `0` is empty, anything else is a power of two.
pub type Tile = u32;

/// Largest tile a grid may hold: the top power of two a [`Tile`] can store.
///
/// Two `MAX_TILE` tiles never merge, so every grid a move produces is
/// itself a valid grid.
pub const MAX_TILE: Tile = 1 << 31;

/// Whether two neighbouring tiles combine when slid together.
pub(crate) fn merges_with(a: Tile, b: Tile) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// A cell coordinate, row-major, `(0, 0)` at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A 4x4 board of tiles.
///
/// On the wire a grid is a row-major nested array:
/// `[[2,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,4]]`. Deserializing goes through
/// [`Grid::try_from`], so a malformed board is rejected before it ever
/// reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<Tile>>")]
pub struct Grid {
    cells: [[Tile; SIZE]; SIZE],
}

impl Grid {
    /// A board with every cell empty.
    pub const EMPTY: Grid = Grid {
        cells: [[0; SIZE]; SIZE],
    };

    /// Builds a grid from rows, checking every cell.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidTile`] for any value that is neither 0
    /// nor a power of two, or that exceeds [`MAX_TILE`].
    pub fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Result<Self, EngineError> {
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if !is_valid_tile(u64::from(value)) {
                    return Err(EngineError::InvalidTile {
                        row: r,
                        col: c,
                        value: u64::from(value),
                    });
                }
            }
        }
        Ok(Self { cells: rows })
    }

    /// Wraps cells produced by the engine itself, which are valid by construction.
    pub(crate) fn from_cells(cells: [[Tile; SIZE]; SIZE]) -> Self {
        Self { cells }
    }

    /// Borrows the rows, top to bottom.
    pub fn rows(&self) -> &[[Tile; SIZE]; SIZE] {
        &self.cells
    }

    /// Returns the tile at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn get(&self, pos: Position) -> Tile {
        self.cells[pos.row][pos.col]
    }

    /// Writes a tile. Only the spawner places tiles outside of a move.
    pub(crate) fn place(&mut self, pos: Position, tile: Tile) {
        self.cells[pos.row][pos.col] = tile;
    }

    /// All empty cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        let mut empties = Vec::with_capacity(SIZE * SIZE);
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                if tile == 0 {
                    empties.push(Position::new(r, c));
                }
            }
        }
        empties
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().flatten().filter(|&&t| t == 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.count_empty() == 0
    }

    /// Sum of every tile on the board.
    pub fn sum(&self) -> u64 {
        self.cells.iter().flatten().map(|&t| u64::from(t)).sum()
    }

    /// The highest tile on the board, `0` for an empty board.
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

fn is_valid_tile(value: u64) -> bool {
    value == 0 || (value.is_power_of_two() && value <= u64::from(MAX_TILE))
}

impl TryFrom<Vec<Vec<u64>>> for Grid {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> {
        if rows.len() != SIZE || rows.iter().any(|row| row.len() != SIZE) {
            return Err(EngineError::InvalidShape {
                rows: rows.len(),
                row_lengths: rows.iter().map(Vec::len).collect(),
            });
        }

        let mut cells = [[0; SIZE]; SIZE];
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(EngineError::InvalidTile { row: r, col: c, value });
                }
                // MAX_TILE is the largest u32 power of two, so the narrowing is lossless.
                cells[r][c] = value as Tile;
            }
        }
        Ok(Self { cells })
    }
}

impl From<Grid> for Vec<Vec<Tile>> {
    fn from(grid: Grid) -> Self {
        grid.cells.iter().map(|row| row.to_vec()).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            if r > 0 {
                writeln!(f, "-----------------------------")?;
            }
            let line: Vec<String> = row
                .iter()
                .map(|&t| if t == 0 { format!("{:>6}", ".") } else { format!("{t:>6}") })
                .collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_valid_board_ok() {
        let grid = Grid::from_rows([[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 8, 0], [0, 0, 0, 2048]])
            .unwrap();
        assert_eq!(grid.get(Position::new(3, 3)), 2048);
        assert_eq!(grid.count_empty(), 12);
    }

    #[test]
    fn test_from_rows_non_power_of_two_rejected() {
        let err = Grid::from_rows([[2, 3, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap_err();
        assert_eq!(err, EngineError::InvalidTile { row: 0, col: 1, value: 3 });
    }

    #[test]
    fn test_empty_cells_row_major_order() {
        let grid = Grid::from_rows([[2, 2, 2, 2], [2, 0, 2, 2], [2, 2, 2, 2], [2, 2, 2, 0]])
            .unwrap();
        assert_eq!(grid.empty_cells(), vec![Position::new(1, 1), Position::new(3, 3)]);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_sum_and_highest_tile() {
        let grid = Grid::from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0, 0, 0, 64]]).unwrap();
        assert_eq!(grid.sum(), 70);
        assert_eq!(grid.highest_tile(), 64);
        assert_eq!(Grid::EMPTY.highest_tile(), 0);
    }

    #[test]
    fn test_grid_serializes_as_nested_rows() {
        let grid = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, "[[2,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,4]]");
    }

    #[test]
    fn test_grid_deserialize_wrong_shape_rejected() {
        let result: Result<Grid, _> = serde_json::from_str("[[2,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]");
        assert!(result.is_err());

        let result: Result<Grid, _> = serde_json::from_str("[[0,0,0,0],[0,0,0,0],[0,0,0,0]]");
        assert!(result.is_err());
    }

    #[test]
    fn test_grid_deserialize_bad_tile_rejected() {
        let result: Result<Grid, _> =
            serde_json::from_str("[[6,0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]");
        assert!(result.unwrap_err().to_string().contains("invalid tile 6"));
    }

    #[test]
    fn test_grid_json_roundtrip_preserves_cells() {
        let grid = Grid::from_rows([[2, 4, 8, 16], [32, 64, 128, 256], [0; 4], [0, 0, 0, 1024]])
            .unwrap();
        let back: Grid = serde_json::from_str(&serde_json::to_string(&grid).unwrap()).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    fn test_grid_deserialize_above_max_tile_rejected() {
        let json = format!("[[{},0,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]]", 1u64 << 32);
        let result: Result<Grid, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn test_max_tile_grid_survives_json() {
        let grid = Grid::from_rows([[MAX_TILE, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
        let back: Grid = serde_json::from_str(&serde_json::to_string(&grid).unwrap()).unwrap();
        assert_eq!(back, grid);
    }
}
