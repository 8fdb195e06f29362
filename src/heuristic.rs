//! Static positional values.
//!
//! Corners can only be flipped from three tiles and edges from four, so they
//! are the most stable tiles to hold. The interior ring around each corner is
//! penalised because activating it exposes that corner.

use crate::constants::{VALUE_CORNER, VALUE_EDGE, VALUE_INTERIOR, VALUE_TRAP, VALUE_UNIFORM};

/// Positional class of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileClass {
    Corner,
    Edge,
    Trap,
    Interior,
}

impl TileClass {
    /// Classify (r, c) on an NxN grid.
    pub fn of(size: usize, r: usize, c: usize) -> Self {
        let last = size - 1;
        let row_edge = r == 0 || r == last;
        let col_edge = c == 0 || c == last;

        if row_edge && col_edge {
            TileClass::Corner
        } else if row_edge || col_edge {
            TileClass::Edge
        } else if (r <= 1 || r + 2 >= size) && (c <= 1 || c + 2 >= size) {
            TileClass::Trap
        } else {
            TileClass::Interior
        }
    }

    pub fn value(self) -> f64 {
        match self {
            TileClass::Corner => VALUE_CORNER,
            TileClass::Edge => VALUE_EDGE,
            TileClass::Trap => VALUE_TRAP,
            TileClass::Interior => VALUE_INTERIOR,
        }
    }
}

/// Per-tile strategic value, fixed for the lifetime of a game.
#[derive(Clone, Debug)]
pub struct HeuristicMap {
    size: usize,
    values: Vec<f64>,
}

impl HeuristicMap {
    /// Corner / edge / trap / interior values.
    pub fn positional(size: usize) -> Self {
        let values = (0..size * size)
            .map(|tile| TileClass::of(size, tile / size, tile % size).value())
            .collect();
        Self { size, values }
    }

    /// Every tile worth the same, which turns evaluation into a tile count.
    pub fn uniform(size: usize) -> Self {
        Self {
            size,
            values: vec![VALUE_UNIFORM; size * size],
        }
    }

    /// Value of `tile`. Callers validate the index against the board first.
    #[inline]
    pub fn value(&self, tile: usize) -> f64 {
        self.values[tile]
    }

    pub fn class(&self, tile: usize) -> TileClass {
        TileClass::of(self.size, tile / self.size, tile % self.size)
    }

    /// Sum over the whole board.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    #[inline]
    pub fn tiles(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_4x4_layout() {
        let map = HeuristicMap::positional(4);
        #[rustfmt::skip]
        let expected = [
            25.0, 15.0, 15.0, 25.0,
            15.0, -5.0, -5.0, 15.0,
            15.0, -5.0, -5.0, 15.0,
            25.0, 15.0, 15.0, 25.0,
        ];
        for (tile, &v) in expected.iter().enumerate() {
            assert_eq!(map.value(tile), v, "tile {tile}");
        }
        assert_eq!(map.total(), 200.0);
    }

    #[test]
    fn test_6x6_has_plain_interior() {
        let map = HeuristicMap::positional(6);
        // (2,2) is two rings in from every corner
        assert_eq!(map.class(14), TileClass::Interior);
        assert_eq!(map.value(14), VALUE_INTERIOR);
        // (1,1) and (4,4) are traps
        assert_eq!(map.class(7), TileClass::Trap);
        assert_eq!(map.class(28), TileClass::Trap);
        // (1,2) is not next to a corner on a 6x6
        assert_eq!(map.class(8), TileClass::Interior);
    }

    #[test]
    fn test_uniform() {
        let map = HeuristicMap::uniform(5);
        assert_eq!(map.tiles(), 25);
        assert_eq!(map.total(), 25.0);
    }
}
