//! Engine and session configuration.
//!
//! The game shipped in several near-identical tunings. Each of them is a
//! [`Difficulty`] preset here; every constant that differs between presets is
//! a named field of [`EngineConfig`].

use clap::ValueEnum;

use crate::adjacency::Pattern;
use crate::constants::*;
use crate::error::{EngineError, EngineResult};

/// How the lock memory restricts play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LockPolicy {
    /// Locks are tracked for display only.
    None,
    /// Locked tiles cannot be chosen as a move.
    Exclusion,
    /// Locked tiles cannot be chosen and are not toggled by neighbouring
    /// moves. Their value counts 1.5x in evaluation.
    Immunity,
}

impl LockPolicy {
    /// Whether locked tiles are removed from the candidate set.
    #[inline]
    pub fn excludes(self) -> bool {
        !matches!(self, LockPolicy::None)
    }

    /// Whether locked tiles are shielded from side-effect flips.
    #[inline]
    pub fn shields(self) -> bool {
        matches!(self, LockPolicy::Immunity)
    }
}

/// Size of the lock queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LockCapacity {
    Fixed(usize),
    /// `max(2, N*N/4)`.
    QuarterBoard,
}

impl LockCapacity {
    pub fn resolve(self, tiles: usize) -> usize {
        match self {
            LockCapacity::Fixed(k) => k,
            LockCapacity::QuarterBoard => LOCK_CAPACITY_MIN.max(tiles / 4),
        }
    }
}

/// How equal-scoring candidates are resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TieBreak {
    /// Uniformly at random among the tied candidates.
    Random,
    /// Stable ranking; the lowest tile index wins.
    LowestIndex,
}

/// Which tile values the evaluator sums.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scoring {
    /// Corner / edge / trap / interior values.
    Positional,
    /// Every tile worth 1: plain tile count.
    TileCount,
}

/// Named tunings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// Greedy with a 50% blunder rate and a fixed lock list.
    Easy,
    /// Greedy with a 15% blunder rate; locked tiles are immune to flips.
    #[default]
    Hard,
    /// Two-ply lookahead with trap detection, no blunders.
    Predictive,
    /// Tile-count greedy without locks; never undoes the human's last move.
    Classic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub lock_policy: LockPolicy,
    pub lock_capacity: LockCapacity,
    /// Chance that the computer plays a random legal tile instead of searching.
    pub blunder_probability: f64,
    /// 1 = greedy, 2 = greedy with the opponent's best reply.
    pub lookahead_plies: u8,
    pub trap_detection: bool,
    pub trap_threshold: usize,
    pub trap_penalty: f64,
    pub tie_break: TieBreak,
    pub scoring: Scoring,
    /// Added to every tile value before summing.
    pub base_value: f64,
    /// Forbid the computer from re-activating the human's last tile.
    pub avoid_last_human_move: bool,
    pub max_turns: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::preset(Difficulty::default())
    }
}

impl EngineConfig {
    pub fn preset(difficulty: Difficulty) -> Self {
        let base = Self {
            lock_policy: LockPolicy::Exclusion,
            lock_capacity: LockCapacity::Fixed(LOCK_CAPACITY_FIXED),
            blunder_probability: 0.0,
            lookahead_plies: 1,
            trap_detection: false,
            trap_threshold: TRAP_THRESHOLD,
            trap_penalty: TRAP_PENALTY,
            tie_break: TieBreak::Random,
            scoring: Scoring::Positional,
            base_value: 0.0,
            avoid_last_human_move: false,
            max_turns: MAX_TURNS,
        };

        match difficulty {
            Difficulty::Easy => Self {
                blunder_probability: BLUNDER_EASY,
                ..base
            },
            Difficulty::Hard => Self {
                lock_policy: LockPolicy::Immunity,
                lock_capacity: LockCapacity::QuarterBoard,
                blunder_probability: BLUNDER_HARD,
                ..base
            },
            Difficulty::Predictive => Self {
                lookahead_plies: MAX_LOOKAHEAD_PLIES,
                trap_detection: true,
                base_value: PREDICTIVE_BASE_VALUE,
                ..base
            },
            Difficulty::Classic => Self {
                lock_policy: LockPolicy::None,
                scoring: Scoring::TileCount,
                tie_break: TieBreak::LowestIndex,
                avoid_last_human_move: true,
                ..base
            },
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.blunder_probability) {
            return Err(EngineError::Config(format!(
                "blunder probability {} is outside [0, 1]",
                self.blunder_probability
            )));
        }
        if !(1..=MAX_LOOKAHEAD_PLIES).contains(&self.lookahead_plies) {
            return Err(EngineError::Config(format!(
                "lookahead of {} plies is not supported (1..={MAX_LOOKAHEAD_PLIES})",
                self.lookahead_plies
            )));
        }
        if self.lock_capacity == LockCapacity::Fixed(0) {
            return Err(EngineError::Config("lock capacity must be at least 1".into()));
        }
        if !self.trap_penalty.is_finite() || !self.base_value.is_finite() {
            return Err(EngineError::Config("trap penalty and base value must be finite".into()));
        }
        if self.max_turns == 0 {
            return Err(EngineError::Config("max turns must be at least 1".into()));
        }
        Ok(())
    }
}

/// Everything needed to start a game.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub grid_size: usize,
    pub pattern: Pattern,
    pub engine: EngineConfig,
    /// Seed for board setup and engine randomness; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            pattern: Pattern::default(),
            engine: EngineConfig::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn new(grid_size: usize, pattern: Pattern, difficulty: Difficulty) -> Self {
        Self {
            grid_size,
            pattern,
            engine: EngineConfig::preset(difficulty),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(EngineError::InvalidGridSize(self.grid_size));
        }
        self.engine.validate()
    }
}
