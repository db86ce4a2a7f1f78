//! Game-over detection.

use crate::grid::{Grid, SIZE, merges_with};

/// Returns `true` when no move can change the board.
///
/// A board is terminal when it has no empty cell and no two neighbouring
/// tiles that would merge, horizontally or vertically. Each cell is compared with its
/// right and lower neighbour only, so every pair is checked once.
///
/// This is a move-existence test, not a win condition: a board holding a
/// 2048 tile keeps going as long as it can move.
pub fn is_terminal(grid: &Grid) -> bool {
    let cells = grid.rows();
    for r in 0..SIZE {
        for c in 0..SIZE {
            let tile = cells[r][c];
            if tile == 0 {
                return false;
            }
            if c + 1 < SIZE && merges_with(tile, cells[r][c + 1]) {
                return false;
            }
            if r + 1 < SIZE && merges_with(tile, cells[r + 1][c]) {
                return false;
            }
        }
    }
    true
}
