//! Flip neighbourhoods.
//!
//! Activating a tile toggles the tile itself plus a fixed set of neighbours.
//! The neighbour sets are computed once per grid and never change during a
//! game, so the model can be shared read-only between concurrent searches.

use clap::ValueEnum;
use fastrand::Rng;

use crate::constants::{DIAGONAL, MAX_GRID_SIZE, MIN_GRID_SIZE, ORTHOGONAL};
use crate::error::{EngineError, EngineResult};

/// Which neighbours a tile flips.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Pattern {
    /// Up, down, left, right ("+").
    #[default]
    Orthogonal,
    /// The four diagonals ("x").
    Diagonal,
    /// Each tile picks "+" or "x" at random when the board is built.
    Mixed,
}

/// Immutable map from a tile to the tiles toggled when it is activated.
#[derive(Clone, Debug)]
pub struct AdjacencyModel {
    size: usize,
    neighbors: Vec<Vec<usize>>,
}

impl AdjacencyModel {
    /// Build the model for a fixed pattern.
    ///
    /// `Pattern::Mixed` draws from a freshly seeded generator; use
    /// [`AdjacencyModel::with_rng`] when the layout must be reproducible.
    pub fn new(size: usize, pattern: Pattern) -> EngineResult<Self> {
        Self::with_rng(size, pattern, &mut Rng::new())
    }

    pub fn with_rng(size: usize, pattern: Pattern, rng: &mut Rng) -> EngineResult<Self> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(EngineError::InvalidGridSize(size));
        }

        let mut neighbors = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                let offsets = match pattern {
                    Pattern::Orthogonal => &ORTHOGONAL,
                    Pattern::Diagonal => &DIAGONAL,
                    Pattern::Mixed if rng.bool() => &ORTHOGONAL,
                    Pattern::Mixed => &DIAGONAL,
                };
                neighbors.push(neighborhood(size, r, c, offsets));
            }
        }

        Ok(Self { size, neighbors })
    }

    /// Grid side length (N).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of tiles (N*N).
    #[inline]
    pub fn tiles(&self) -> usize {
        self.neighbors.len()
    }

    /// Fail with `InvalidTileIndex` unless `tile` is on the board.
    #[inline]
    pub fn check(&self, tile: usize) -> EngineResult<usize> {
        if tile < self.tiles() {
            Ok(tile)
        } else {
            Err(EngineError::InvalidTileIndex {
                tile,
                tiles: self.tiles(),
            })
        }
    }

    /// Tiles toggled when `tile` is activated, the tile itself first.
    pub fn neighbors(&self, tile: usize) -> EngineResult<&[usize]> {
        self.check(tile)?;
        Ok(&self.neighbors[tile])
    }
}

/// Collect `(r, c)` and the in-bounds offsets around it.
fn neighborhood(size: usize, r: usize, c: usize, offsets: &[(isize, isize); 4]) -> Vec<usize> {
    let mut out = Vec::with_capacity(5);
    out.push(r * size + c);
    for &(dr, dc) in offsets {
        let nr = r as isize + dr;
        let nc = c as isize + dc;
        if nr >= 0 && nc >= 0 && (nr as usize) < size && (nc as usize) < size {
            out.push(nr as usize * size + nc as usize);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(tiles: &[usize]) -> Vec<usize> {
        let mut v = tiles.to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_orthogonal_corner() {
        let adj = AdjacencyModel::new(4, Pattern::Orthogonal).unwrap();
        assert_eq!(sorted(adj.neighbors(0).unwrap()), vec![0, 1, 4]);
        assert_eq!(sorted(adj.neighbors(15).unwrap()), vec![11, 14, 15]);
    }

    #[test]
    fn test_orthogonal_center() {
        let adj = AdjacencyModel::new(4, Pattern::Orthogonal).unwrap();
        assert_eq!(sorted(adj.neighbors(5).unwrap()), vec![1, 4, 5, 6, 9]);
    }

    #[test]
    fn test_diagonal_pattern() {
        let adj = AdjacencyModel::new(4, Pattern::Diagonal).unwrap();
        assert_eq!(sorted(adj.neighbors(0).unwrap()), vec![0, 5]);
        assert_eq!(sorted(adj.neighbors(5).unwrap()), vec![0, 2, 5, 8, 10]);
    }

    #[test]
    fn test_self_always_first() {
        let mut rng = Rng::with_seed(11);
        let adj = AdjacencyModel::with_rng(5, Pattern::Mixed, &mut rng).unwrap();
        for tile in 0..adj.tiles() {
            assert_eq!(adj.neighbors(tile).unwrap()[0], tile);
        }
    }

    #[test]
    fn test_mixed_is_reproducible() {
        let a = AdjacencyModel::with_rng(6, Pattern::Mixed, &mut Rng::with_seed(3)).unwrap();
        let b = AdjacencyModel::with_rng(6, Pattern::Mixed, &mut Rng::with_seed(3)).unwrap();
        for tile in 0..a.tiles() {
            assert_eq!(a.neighbors(tile).unwrap(), b.neighbors(tile).unwrap());
        }
    }

    #[test]
    fn test_invalid_tile() {
        let adj = AdjacencyModel::new(4, Pattern::Orthogonal).unwrap();
        assert_eq!(
            adj.neighbors(16),
            Err(EngineError::InvalidTileIndex { tile: 16, tiles: 16 })
        );
    }

    #[test]
    fn test_invalid_grid_size() {
        assert!(matches!(
            AdjacencyModel::new(1, Pattern::Orthogonal),
            Err(EngineError::InvalidGridSize(1))
        ));
        assert!(AdjacencyModel::new(MAX_GRID_SIZE + 1, Pattern::Diagonal).is_err());
    }
}
