//! Tile spawning.
//!
//! The spawner never reaches for an ambient generator. Randomness comes in
//! through a [`TileSource`], so a game can be replayed exactly from a seed
//! ([`RngTiles::seeded`]) or a fixed script ([`ScriptedTiles`]).

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Grid, Position, Tile};

/// Chance that a spawned tile is a 4 rather than a 2.
pub const FOUR_PROBABILITY: f64 = 0.1;

/// Supplies the two random choices a spawn needs.
pub trait TileSource {
    /// Picks an index in `0..len` uniformly. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Returns `true` when the new tile should be a 4.
    fn roll_four(&mut self) -> bool;
}

/// A [`TileSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngTiles<R> {
    rng: R,
}

impl<R: Rng> RngTiles<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngTiles<StdRng> {
    /// A reproducible source: the same seed yields the same spawns.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// A source seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> TileSource for RngTiles<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }

    fn roll_four(&mut self) -> bool {
        self.rng.random_bool(FOUR_PROBABILITY)
    }
}

/// A [`TileSource`] that replays fixed choices.
///
/// Once a queue runs dry it falls back to index 0 and a 2-tile. Indices
/// past the end of the empty-cell list are clamped to the last empty cell.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTiles {
    picks: VecDeque<usize>,
    fours: VecDeque<bool>,
}

impl ScriptedTiles {
    pub fn new(
        picks: impl IntoIterator<Item = usize>,
        fours: impl IntoIterator<Item = bool>,
    ) -> Self {
        Self {
            picks: picks.into_iter().collect(),
            fours: fours.into_iter().collect(),
        }
    }
}

impl TileSource for ScriptedTiles {
    fn pick_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len - 1)
    }

    fn roll_four(&mut self) -> bool {
        self.fours.pop_front().unwrap_or(false)
    }
}

/// Drops a 2 (or, with [`FOUR_PROBABILITY`], a 4) into a random empty cell.
///
/// Returns where the tile landed, or `None` when the board is full. A full
/// board is not an error; the grid is simply left alone.
pub fn spawn_tile<S: TileSource + ?Sized>(grid: &mut Grid, source: &mut S) -> Option<Position> {
    let empties = grid.empty_cells();
    if empties.is_empty() {
        tracing::trace!("board full, no tile spawned");
        return None;
    }

    let pos = empties[source.pick_index(empties.len()).min(empties.len() - 1)];
    let tile: Tile = if source.roll_four() { 4 } else { 2 };
    grid.place(pos, tile);
    tracing::trace!(%pos, tile, "tile spawned");
    Some(pos)
}
