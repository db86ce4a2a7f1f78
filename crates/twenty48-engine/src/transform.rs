//! Whole-board reorientations used to reduce every move to a left-move.
//!
//! A transform works on any `SIZE x SIZE` array of `Copy` cells, not just
//! tile values. The transition engine relies on this: it moves tiles
//! together with their per-cell merge flags, so both land in the same
//! place when the board is turned back.

use crate::grid::{Grid, SIZE};

/// A board reorientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transform {
    Identity,
    /// Mirror every row left-to-right.
    ReverseRows,
    /// Rotate 90 degrees clockwise.
    RotateCw,
    /// Rotate 90 degrees counter-clockwise.
    RotateCcw,
}

impl Transform {
    /// The transform that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Self::Identity => Self::Identity,
            Self::ReverseRows => Self::ReverseRows,
            Self::RotateCw => Self::RotateCcw,
            Self::RotateCcw => Self::RotateCw,
        }
    }

    /// Applies the transform to a square array of cells.
    pub fn apply<T: Copy>(self, cells: &[[T; SIZE]; SIZE]) -> [[T; SIZE]; SIZE] {
        let mut out = *cells;
        for (r, row) in out.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = match self {
                    Self::Identity => cells[r][c],
                    Self::ReverseRows => cells[r][SIZE - 1 - c],
                    Self::RotateCw => cells[SIZE - 1 - c][r],
                    Self::RotateCcw => cells[c][SIZE - 1 - r],
                };
            }
        }
        out
    }

    pub fn apply_grid(self, grid: &Grid) -> Grid {
        Grid::from_cells(self.apply(grid.rows()))
    }
}
