//! Error types for the engine layer.

/// Errors raised when untrusted input is turned into engine types.
///
/// The engine itself never fails once it holds a valid [`Grid`](crate::Grid)
/// and [`Direction`](crate::Direction): moves that change nothing and spawns
/// on a full board are reported through return values, not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The direction name is not one of `up`, `down`, `left`, `right`.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    /// The board does not have exactly `SIZE` rows of `SIZE` cells.
    #[error("invalid board shape: expected 4x4, got {rows} rows (row lengths {row_lengths:?})")]
    InvalidShape {
        rows: usize,
        row_lengths: Vec<usize>,
    },

    /// A cell holds something other than 0 or a power of two.
    #[error("invalid tile {value} at ({row}, {col})")]
    InvalidTile { row: usize, col: usize, value: u64 },
}
