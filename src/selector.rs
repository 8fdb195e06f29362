//! Move selection: greedy search with optional lookahead, trap detection,
//! tie-breaking, and blunders.
//!
//! For every legal candidate the selector simulates the move on a copy of the
//! board and scores the result. With a two-ply lookahead the opponent's best
//! greedy reply is played on top before scoring. Trap detection deducts a
//! fixed penalty from candidates that let the opponent win back many tiles
//! on the next turn; such candidates stay eligible.
//!
//! Nothing here touches the live game: every call works on a [`Snapshot`].

use std::sync::Arc;

use fastrand::Rng;
use tracing::{debug, trace};

use crate::adjacency::AdjacencyModel;
use crate::board::{BoardState, Side};
use crate::config::{EngineConfig, Scoring, TieBreak};
use crate::error::{EngineError, EngineResult};
use crate::eval::Evaluator;
use crate::heuristic::HeuristicMap;
use crate::lock::LockMemory;
use crate::simulate::Simulator;

/// Everything a decision needs, captured by value.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub board: BoardState,
    pub locks: LockMemory,
    /// Tile the human activated most recently, for the repetition rule.
    pub last_human_move: Option<usize>,
}

impl Snapshot {
    pub fn new(board: BoardState, locks: LockMemory) -> Self {
        Self {
            board,
            locks,
            last_human_move: None,
        }
    }

    pub fn with_last_human_move(mut self, tile: usize) -> Self {
        self.last_human_move = Some(tile);
        self
    }
}

/// A candidate tile and the score it was ranked by.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoredMove {
    pub tile: usize,
    pub score: f64,
}

/// The decision procedure. Cheap to clone: the board geometry and the
/// heuristic map are shared.
#[derive(Clone, Debug)]
pub struct MoveSelector {
    config: EngineConfig,
    simulator: Simulator,
    evaluator: Evaluator,
}

impl MoveSelector {
    pub fn new(config: EngineConfig, adjacency: Arc<AdjacencyModel>) -> EngineResult<Self> {
        config.validate()?;
        let heuristics = match config.scoring {
            Scoring::Positional => HeuristicMap::positional(adjacency.size()),
            Scoring::TileCount => HeuristicMap::uniform(adjacency.size()),
        };
        let evaluator = Evaluator::new(Arc::new(heuristics), config.lock_policy, config.base_value);
        let simulator = Simulator::new(adjacency, config.lock_policy);
        Ok(Self {
            config,
            simulator,
            evaluator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn adjacency(&self) -> &AdjacencyModel {
        self.simulator.adjacency()
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Scoreboard value of the snapshot for `side`.
    pub fn evaluate(&self, snapshot: &Snapshot, side: Side) -> EngineResult<f64> {
        self.check_snapshot(snapshot)?;
        self.evaluator.evaluate(&snapshot.board, &snapshot.locks, side)
    }

    /// The computer's move, or `None` when no tile may be played.
    ///
    /// Subject to the configured blunder probability.
    pub fn get_best_move(&self, snapshot: &Snapshot, rng: &mut Rng) -> EngineResult<Option<usize>> {
        self.choose(snapshot, Side::Computer, rng, true)
    }

    /// The move the engine would play for the human. Never blunders.
    pub fn get_hint(&self, snapshot: &Snapshot, rng: &mut Rng) -> EngineResult<Option<usize>> {
        self.choose(snapshot, Side::Human, rng, false)
    }

    /// Tiles `side` may activate in this snapshot, in index order.
    pub fn candidates(&self, snapshot: &Snapshot, side: Side) -> Vec<usize> {
        let forbidden = match side {
            Side::Computer => self.repetition_block(&snapshot.board, snapshot.last_human_move),
            Side::Human => None,
        };
        self.legal_tiles(&snapshot.board, &snapshot.locks, forbidden)
    }

    /// Every candidate with its score, best first. Equal scores keep tile
    /// order, so the ranking is deterministic.
    pub fn ranked_moves(&self, snapshot: &Snapshot, side: Side) -> EngineResult<Vec<ScoredMove>> {
        self.check_snapshot(snapshot)?;
        let mut scored = self.score_all(snapshot, side)?;
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }

    /// The opponent's best greedy reply on `board`: the first tile, in index
    /// order, with the highest one-ply score for `side`.
    pub fn best_reply(
        &self,
        board: &BoardState,
        locks: &LockMemory,
        side: Side,
        forbidden: Option<usize>,
    ) -> EngineResult<Option<usize>> {
        let mut best: Option<ScoredMove> = None;
        for tile in self.legal_tiles(board, locks, forbidden) {
            let next = self.simulator.simulate(board, locks, tile)?;
            let score = self.evaluator.evaluate(&next, locks, side)?;
            if best.is_none_or(|b| score > b.score) {
                best = Some(ScoredMove { tile, score });
            }
        }
        Ok(best.map(|b| b.tile))
    }

    /// Most tiles `side` can gain with a single move on `board`.
    /// Zero when `side` has no legal move.
    pub fn max_gain(
        &self,
        board: &BoardState,
        locks: &LockMemory,
        side: Side,
        forbidden: Option<usize>,
    ) -> EngineResult<i64> {
        let before = board.count(side) as i64;
        let mut best: Option<i64> = None;
        for tile in self.legal_tiles(board, locks, forbidden) {
            let gain = self.simulator.simulate(board, locks, tile)?.count(side) as i64 - before;
            best = Some(best.map_or(gain, |b| b.max(gain)));
        }
        Ok(best.unwrap_or(0))
    }

    fn choose(
        &self,
        snapshot: &Snapshot,
        side: Side,
        rng: &mut Rng,
        allow_blunder: bool,
    ) -> EngineResult<Option<usize>> {
        self.check_snapshot(snapshot)?;

        let candidates = self.candidates(snapshot, side);
        if candidates.is_empty() {
            debug!(%side, "no legal move");
            return Ok(None);
        }

        if allow_blunder && rng.f64() < self.config.blunder_probability {
            let tile = candidates[rng.usize(..candidates.len())];
            debug!(%side, tile, "blunder");
            return Ok(Some(tile));
        }

        let chosen = match self.config.tie_break {
            TieBreak::LowestIndex => self.ranked_moves(snapshot, side)?.first().copied(),
            TieBreak::Random => {
                let mut best_score = f64::NEG_INFINITY;
                let mut tied: Vec<ScoredMove> = Vec::new();
                for mv in self.score_all(snapshot, side)? {
                    if mv.score > best_score {
                        best_score = mv.score;
                        tied.clear();
                        tied.push(mv);
                    } else if mv.score == best_score {
                        tied.push(mv);
                    }
                }
                match tied.len() {
                    0 => None,
                    1 => Some(tied[0]),
                    n => Some(tied[rng.usize(..n)]),
                }
            }
        };

        if let Some(mv) = chosen {
            debug!(%side, tile = mv.tile, score = mv.score, "selected move");
        }
        Ok(chosen.map(|mv| mv.tile))
    }

    fn score_all(&self, snapshot: &Snapshot, side: Side) -> EngineResult<Vec<ScoredMove>> {
        self.candidates(snapshot, side)
            .into_iter()
            .map(|tile| {
                let score = self.score_candidate(snapshot, side, tile)?;
                trace!(%side, tile, score, "candidate");
                Ok(ScoredMove { tile, score })
            })
            .collect()
    }

    fn score_candidate(&self, snapshot: &Snapshot, side: Side, tile: usize) -> EngineResult<f64> {
        let Snapshot { board, locks, .. } = snapshot;
        let after = self.simulator.simulate(board, locks, tile)?;

        let lookahead = self.config.lookahead_plies > 1;
        if !lookahead && !self.config.trap_detection {
            return self.evaluator.evaluate(&after, locks, side);
        }

        // The move just played is locked before the opponent answers.
        let mut reply_locks = locks.clone();
        reply_locks.record(tile);
        let opponent = side.opponent();
        let reply_block = match opponent {
            Side::Computer => self.repetition_block(&after, Some(tile)),
            Side::Human => None,
        };

        let mut score = if lookahead {
            match self.best_reply(&after, &reply_locks, opponent, reply_block)? {
                Some(reply) => {
                    let end = self.simulator.simulate(&after, &reply_locks, reply)?;
                    let mut end_locks = reply_locks.clone();
                    end_locks.record(reply);
                    self.evaluator.evaluate(&end, &end_locks, side)?
                }
                None => self.evaluator.evaluate(&after, &reply_locks, side)?,
            }
        } else {
            self.evaluator.evaluate(&after, locks, side)?
        };

        if self.config.trap_detection {
            let gain = self.max_gain(&after, &reply_locks, opponent, reply_block)?;
            if gain >= self.config.trap_threshold as i64 {
                trace!(%side, tile, gain, "trap");
                score -= self.config.trap_penalty;
            }
        }

        Ok(score)
    }

    /// Tiles not excluded by the lock policy or `forbidden`.
    fn legal_tiles(
        &self,
        board: &BoardState,
        locks: &LockMemory,
        forbidden: Option<usize>,
    ) -> Vec<usize> {
        let excludes = self.config.lock_policy.excludes();
        (0..board.tiles())
            .filter(|&tile| !(excludes && locks.is_locked(tile)))
            .filter(|&tile| forbidden != Some(tile))
            .collect()
    }

    /// The human's last tile, if the computer may not re-activate it yet.
    fn repetition_block(&self, board: &BoardState, last_human_move: Option<usize>) -> Option<usize> {
        let near_end = board.turns_played + 1 >= self.config.max_turns;
        if self.config.avoid_last_human_move && !near_end {
            last_human_move
        } else {
            None
        }
    }

    fn check_snapshot(&self, snapshot: &Snapshot) -> EngineResult<()> {
        if snapshot.board.tiles() != self.adjacency().tiles() {
            return Err(EngineError::InvalidGridSize(snapshot.board.size));
        }
        Ok(())
    }
}
