use std::fmt;

use clap::ValueEnum;

use crate::adjacency::AdjacencyModel;
use crate::error::{EngineError, EngineResult};
use crate::lock::LockMemory;

/// The two players. A tile owned by the human is "yellow" (`true`), a tile
/// owned by the computer is "grey" (`false`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Side {
    Human,
    Computer,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Computer,
            Side::Computer => Side::Human,
        }
    }

    /// Whether a tile with ownership bit `yellow` belongs to this side.
    #[inline]
    pub fn owns(self, yellow: bool) -> bool {
        yellow == (self == Side::Human)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => write!(f, "human"),
            Side::Computer => write!(f, "computer"),
        }
    }
}

/// Tile ownership plus turn bookkeeping.
///
/// Owned by the game session. Decisions run on a clone, so nothing here is
/// shared between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    pub size: usize,
    cells: Vec<bool>,
    /// Completed rounds (human move + computer reply).
    pub turns_played: u32,
    /// Bumped on every reset; results computed for an older round are stale.
    pub round_id: u64,
}

impl BoardState {
    /// An all-grey board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
            turns_played: 0,
            round_id: 0,
        }
    }

    /// Build from explicit ownership bits (row-major, `true` = human).
    pub fn from_owners(size: usize, owners: &[bool]) -> EngineResult<Self> {
        if owners.len() != size * size {
            return Err(EngineError::InvalidGridSize(size));
        }
        Ok(Self {
            size,
            cells: owners.to_vec(),
            turns_played: 0,
            round_id: 0,
        })
    }

    #[inline]
    pub fn tiles(&self) -> usize {
        self.cells.len()
    }

    pub fn owner(&self, tile: usize) -> EngineResult<Side> {
        match self.cells.get(tile) {
            Some(true) => Ok(Side::Human),
            Some(false) => Ok(Side::Computer),
            None => Err(EngineError::InvalidTileIndex {
                tile,
                tiles: self.tiles(),
            }),
        }
    }

    /// Ownership bits, row-major.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Tiles currently held by `side`.
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|&&y| side.owns(y)).count()
    }

    /// The side holding every tile, if any.
    pub fn uniform_owner(&self) -> Option<Side> {
        match self.count(Side::Human) {
            0 => Some(Side::Computer),
            n if n == self.tiles() => Some(Side::Human),
            _ => None,
        }
    }

    /// Toggle every tile in the neighbourhood of `tile`.
    ///
    /// With a `shield`, tiles locked in it keep their owner (immunity policy).
    /// Under a fixed neighbourhood and shield this is its own inverse.
    pub fn apply_move(
        &mut self,
        adjacency: &AdjacencyModel,
        tile: usize,
        shield: Option<&LockMemory>,
    ) -> EngineResult<()> {
        if adjacency.tiles() != self.tiles() {
            return Err(EngineError::InvalidGridSize(adjacency.size()));
        }
        for &n in adjacency.neighbors(tile)? {
            if shield.is_some_and(|locks| locks.is_locked(n)) {
                continue;
            }
            self.cells[n] = !self.cells[n];
        }
        Ok(())
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let ch = if self.cells[r * self.size + c] { 'Y' } else { '.' };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
