//! Constants for board geometry, positional values, and engine tuning.
//!
//! This module contains the default values behind [`crate::config::EngineConfig`]
//! and the difficulty presets. Nothing here is mutable at runtime; every
//! constant that differs between presets is also a named config field.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported grid (NxN).
pub const MIN_GRID_SIZE: usize = 2;

/// Largest supported grid (NxN).
pub const MAX_GRID_SIZE: usize = 12;

/// Grid size used when none is given. The game is usually played on 4, 5 or 6.
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Orthogonal neighbour offsets as (row, col). Order: North, South, West, East.
pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal neighbour offsets as (row, col). Order: NW, NE, SW, SE.
pub const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

// =============================================================================
// Positional Values
// =============================================================================

/// Corner tiles.
pub const VALUE_CORNER: f64 = 25.0;

/// Edge tiles that are not corners.
pub const VALUE_EDGE: f64 = 15.0;

/// Interior tiles in the ring next to a corner. Activating them tends to hand
/// the adjacent corner to the opponent.
pub const VALUE_TRAP: f64 = -5.0;

/// Every other interior tile.
pub const VALUE_INTERIOR: f64 = 5.0;

/// Per-tile value under tile-count scoring.
pub const VALUE_UNIFORM: f64 = 1.0;

/// Multiplier applied to a locked tile's value under the immunity policy.
pub const LOCKED_VALUE_MULTIPLIER: f64 = 1.5;

// =============================================================================
// Lock Memory
// =============================================================================

/// Fixed lock capacity of the easy and predictive presets.
pub const LOCK_CAPACITY_FIXED: usize = 8;

/// Lower bound for the board-scaled capacity (`max(2, N*N/4)`).
pub const LOCK_CAPACITY_MIN: usize = 2;

// =============================================================================
// Search Parameters
// =============================================================================

/// Blunder probability of the hard preset.
pub const BLUNDER_HARD: f64 = 0.15;

/// Blunder probability of the easy preset.
pub const BLUNDER_EASY: f64 = 0.50;

/// Deepest supported search (own move + opponent reply).
pub const MAX_LOOKAHEAD_PLIES: u8 = 2;

/// Opponent tile gain at which a candidate counts as walking into a trap.
pub const TRAP_THRESHOLD: usize = 3;

/// Score deducted from a candidate that walks into a trap.
pub const TRAP_PENALTY: f64 = 10.0;

/// Base value added to every tile by the predictive preset.
pub const PREDICTIVE_BASE_VALUE: f64 = 1.0;

// =============================================================================
// Session
// =============================================================================

/// Rounds (human move + computer reply) before the game is decided on score.
pub const MAX_TURNS: u32 = 20;

/// Fewest random activations used to scramble a fresh board.
pub const SETUP_MOVES_MIN: usize = 4;

/// Most random activations used to scramble a fresh board.
pub const SETUP_MOVES_MAX: usize = 6;
