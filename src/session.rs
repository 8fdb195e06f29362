//! A game between a human and the computer.
//!
//! The session owns the live board and lock memory. The computer's turn is
//! split in three so the search can run off the caller's thread:
//!
//! 1. [`GameSession::dispatch`] captures a [`PendingDecision`] (a snapshot,
//!    the engine, and the current round id).
//! 2. [`PendingDecision::compute`] runs the search anywhere.
//! 3. [`GameSession::complete`] applies the result, or discards it when a new
//!    game was started in the meantime.

use std::sync::Arc;

use fastrand::Rng;
use tracing::{info, warn};

use crate::adjacency::{AdjacencyModel, Pattern};
use crate::board::{BoardState, Side};
use crate::config::SessionConfig;
use crate::constants::{SETUP_MOVES_MAX, SETUP_MOVES_MIN};
use crate::error::{EngineError, EngineResult};
use crate::lock::LockMemory;
use crate::selector::{MoveSelector, Snapshot};

/// Why a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// One side holds every tile.
    Sweep,
    /// The round limit was reached; decided on tile count.
    TurnLimit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    /// `None` on a draw.
    pub winner: Option<Side>,
    pub reason: EndReason,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Finished(Outcome),
}

/// A computer decision waiting to be computed.
#[derive(Debug)]
pub struct PendingDecision {
    round_id: u64,
    snapshot: Snapshot,
    selector: MoveSelector,
    rng: Rng,
}

impl PendingDecision {
    /// The round this decision was dispatched in.
    pub fn round_id(&self) -> u64 {
        self.round_id
    }

    /// Run the search. Touches nothing but the captured snapshot.
    pub fn compute(mut self) -> EngineResult<ComputedMove> {
        let tile = self.selector.get_best_move(&self.snapshot, &mut self.rng)?;
        Ok(ComputedMove {
            round_id: self.round_id,
            tile,
        })
    }
}

/// Result of [`PendingDecision::compute`], tagged with its round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ComputedMove {
    pub round_id: u64,
    /// `None` when the engine found no legal move.
    pub tile: Option<usize>,
}

/// What [`GameSession::complete`] did with a computed move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Applied {
        tile: usize,
        /// The engine had no move and the session picked one.
        fallback: bool,
        status: GameStatus,
    },
    /// Computed for an earlier round or a finished game; nothing changed.
    Stale,
}

pub struct GameSession {
    config: SessionConfig,
    selector: MoveSelector,
    board: BoardState,
    locks: LockMemory,
    last_human_move: Option<usize>,
    turn: Side,
    status: GameStatus,
    rng: Rng,
}

impl GameSession {
    /// Validate the configuration and start the first game.
    pub fn new(config: SessionConfig) -> EngineResult<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        let selector = build_selector(&config, &mut rng)?;
        let tiles = config.grid_size * config.grid_size;
        let locks = LockMemory::new(config.engine.lock_capacity.resolve(tiles));

        let mut session = Self {
            board: BoardState::new(config.grid_size),
            config,
            selector,
            locks,
            last_human_move: None,
            turn: Side::Human,
            status: GameStatus::InProgress,
            rng,
        };
        session.start_new_game()?;
        Ok(session)
    }

    /// Reset to a freshly scrambled board. Any decision still in flight
    /// belongs to the previous round and will be discarded.
    ///
    /// A mixed layout is re-rolled for every game after the first.
    pub fn start_new_game(&mut self) -> EngineResult<()> {
        if self.config.pattern == Pattern::Mixed && self.board.round_id > 0 {
            self.selector = build_selector(&self.config, &mut self.rng)?;
        }

        let round_id = self.board.round_id + 1;
        self.board = BoardState::new(self.config.grid_size);
        self.board.round_id = round_id;
        self.locks.clear();
        self.last_human_move = None;
        self.turn = Side::Human;
        self.status = GameStatus::InProgress;

        let tiles = self.board.tiles();
        for _ in 0..self.rng.usize(SETUP_MOVES_MIN..=SETUP_MOVES_MAX) {
            let tile = self.rng.usize(..tiles);
            self.board.apply_move(self.selector.adjacency(), tile, None)?;
        }
        // A scramble can land on a swept board; that game would be over
        // before it starts.
        if self.board.uniform_owner().is_some() {
            let tile = self.rng.usize(..tiles);
            self.board.apply_move(self.selector.adjacency(), tile, None)?;
        }

        info!(round_id, size = self.config.grid_size, "new game");
        Ok(())
    }

    /// Activate `tile` for the human.
    pub fn play_human(&mut self, tile: usize) -> EngineResult<GameStatus> {
        self.ensure_turn(Side::Human)?;
        let tile = self.selector.adjacency().check(tile)?;
        if self.selector.config().lock_policy.excludes() && self.locks.is_locked(tile) {
            return Err(EngineError::TileLocked {
                tile,
                countdown: self.locks.countdown(tile),
            });
        }

        self.apply(tile)?;
        self.last_human_move = Some(tile);
        self.turn = Side::Computer;
        self.refresh_status();
        Ok(self.status)
    }

    /// Capture everything the computer's search needs.
    pub fn dispatch(&mut self) -> EngineResult<PendingDecision> {
        self.ensure_turn(Side::Computer)?;
        Ok(PendingDecision {
            round_id: self.board.round_id,
            snapshot: self.snapshot(),
            selector: self.selector.clone(),
            rng: self.rng.fork(),
        })
    }

    /// Apply a computed move if it still belongs to the current game.
    pub fn complete(&mut self, computed: ComputedMove) -> EngineResult<Completion> {
        if computed.round_id != self.board.round_id || self.status != GameStatus::InProgress {
            warn!(
                computed = computed.round_id,
                current = self.board.round_id,
                "discarding stale decision"
            );
            return Ok(Completion::Stale);
        }
        self.ensure_turn(Side::Computer)?;

        let (tile, fallback) = match computed.tile {
            Some(tile) => (self.selector.adjacency().check(tile)?, false),
            None => {
                let tile = self.fallback_move();
                warn!(tile, "engine found no move, falling back");
                (tile, true)
            }
        };

        self.apply(tile)?;
        self.board.turns_played += 1;
        self.turn = Side::Human;
        self.refresh_status();
        Ok(Completion::Applied {
            tile,
            fallback,
            status: self.status,
        })
    }

    /// Dispatch, compute and complete on the current thread.
    pub fn play_computer(&mut self) -> EngineResult<Completion> {
        let computed = self.dispatch()?.compute()?;
        self.complete(computed)
    }

    /// The tile the engine recommends to the human.
    pub fn hint(&mut self) -> EngineResult<Option<usize>> {
        if self.status != GameStatus::InProgress {
            return Err(EngineError::GameOver);
        }
        let snapshot = self.snapshot();
        self.selector.get_hint(&snapshot, &mut self.rng)
    }

    /// Scoreboard value for `side`.
    pub fn evaluate(&self, side: Side) -> EngineResult<f64> {
        self.selector
            .evaluator()
            .evaluate(&self.board, &self.locks, side)
    }

    /// (human tiles, computer tiles).
    pub fn counts(&self) -> (usize, usize) {
        (self.board.count(Side::Human), self.board.count(Side::Computer))
    }

    /// A value copy of the live state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            locks: self.locks.clone(),
            last_human_move: self.last_human_move,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn locks(&self) -> &LockMemory {
        &self.locks
    }

    pub fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn round_id(&self) -> u64 {
        self.board.round_id
    }

    fn apply(&mut self, tile: usize) -> EngineResult<()> {
        let shield = self
            .selector
            .config()
            .lock_policy
            .shields()
            .then_some(&self.locks);
        self.board.apply_move(self.selector.adjacency(), tile, shield)?;
        self.locks.record(tile);
        Ok(())
    }

    fn ensure_turn(&self, side: Side) -> EngineResult<()> {
        if self.status != GameStatus::InProgress {
            return Err(EngineError::GameOver);
        }
        if self.turn != side {
            return Err(EngineError::OutOfTurn(self.turn));
        }
        Ok(())
    }

    /// Least recently locked tile, else the tile after the human's last one.
    fn fallback_move(&self) -> usize {
        let tiles = self.board.tiles();
        self.locks
            .oldest()
            .or(self.last_human_move.map(|t| (t + 1) % tiles))
            .unwrap_or(0)
    }

    fn refresh_status(&mut self) {
        let outcome = if let Some(side) = self.board.uniform_owner() {
            Some(Outcome {
                winner: Some(side),
                reason: EndReason::Sweep,
            })
        } else if self.board.turns_played >= self.selector.config().max_turns {
            let (human, computer) = self.counts();
            let winner = match human.cmp(&computer) {
                std::cmp::Ordering::Greater => Some(Side::Human),
                std::cmp::Ordering::Less => Some(Side::Computer),
                std::cmp::Ordering::Equal => None,
            };
            Some(Outcome {
                winner,
                reason: EndReason::TurnLimit,
            })
        } else {
            None
        };

        if let Some(outcome) = outcome {
            info!(winner = ?outcome.winner, reason = ?outcome.reason, "game over");
            self.status = GameStatus::Finished(outcome);
        }
    }
}

fn build_selector(config: &SessionConfig, rng: &mut Rng) -> EngineResult<MoveSelector> {
    let adjacency = AdjacencyModel::with_rng(config.grid_size, config.pattern, rng)?;
    MoveSelector::new(config.engine.clone(), Arc::new(adjacency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Difficulty, EngineConfig, LockCapacity, LockPolicy};

    fn session(difficulty: Difficulty, seed: u64) -> GameSession {
        let config = SessionConfig::new(4, Pattern::Orthogonal, difficulty).with_seed(seed);
        GameSession::new(config).unwrap()
    }

    #[test]
    fn test_new_game_is_scrambled() {
        let s = session(Difficulty::Hard, 5);
        assert_eq!(s.round_id(), 1);
        assert_eq!(s.board().turns_played, 0);
        assert_eq!(s.board().uniform_owner(), None);
        assert!(s.locks().is_empty());
        assert_eq!(s.turn(), Side::Human);
    }

    #[test]
    fn test_seeded_sessions_match() {
        let a = session(Difficulty::Easy, 77);
        let b = session(Difficulty::Easy, 77);
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_turn_order() {
        let mut s = session(Difficulty::Hard, 1);
        assert_eq!(s.dispatch().unwrap_err(), EngineError::OutOfTurn(Side::Human));
        s.play_human(5).unwrap();
        assert_eq!(s.play_human(6).unwrap_err(), EngineError::OutOfTurn(Side::Computer));
        assert!(s.locks().is_locked(5));
        assert!(matches!(s.play_computer().unwrap(), Completion::Applied { .. }));
        assert_eq!(s.board().turns_played, 1);
        assert_eq!(s.locks().len(), 2);
    }

    #[test]
    fn test_locked_tile_rejected() {
        let mut s = session(Difficulty::Easy, 2);
        s.play_human(5).unwrap();
        let Completion::Applied { tile, .. } = s.play_computer().unwrap() else {
            panic!("expected the move to be applied");
        };
        let err = s.play_human(tile).unwrap_err();
        assert!(matches!(err, EngineError::TileLocked { .. }));
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut s = session(Difficulty::Hard, 3);
        s.play_human(0).unwrap();
        let pending = s.dispatch().unwrap();
        s.start_new_game().unwrap();
        let before = s.board().clone();
        let computed = pending.compute().unwrap();
        assert_eq!(s.complete(computed).unwrap(), Completion::Stale);
        assert_eq!(s.board(), &before);
        assert_eq!(s.round_id(), 2);
    }

    #[test]
    fn test_fallback_when_no_move() {
        let mut config = SessionConfig::new(4, Pattern::Orthogonal, Difficulty::Easy).with_seed(4);
        config.engine = EngineConfig {
            lock_policy: LockPolicy::Exclusion,
            lock_capacity: LockCapacity::Fixed(16),
            ..config.engine
        };
        let mut s = GameSession::new(config).unwrap();
        s.play_human(0).unwrap();
        let round_id = s.round_id();
        let completion = s.complete(ComputedMove { round_id, tile: None }).unwrap();
        assert!(matches!(
            completion,
            Completion::Applied {
                tile: 0,
                fallback: true,
                ..
            }
        ));
    }

    #[test]
    fn test_mixed_layout_built_once_per_game() {
        let config = SessionConfig::new(5, Pattern::Mixed, Difficulty::Hard).with_seed(61);
        let mut s = GameSession::new(config).unwrap();
        let expected = AdjacencyModel::with_rng(5, Pattern::Mixed, &mut Rng::with_seed(61)).unwrap();
        for tile in 0..25 {
            assert_eq!(
                s.selector().adjacency().neighbors(tile).unwrap(),
                expected.neighbors(tile).unwrap()
            );
        }

        s.start_new_game().unwrap();
        assert_eq!(s.round_id(), 2);
        assert_eq!(s.selector().adjacency().tiles(), 25);
    }

    #[test]
    fn test_evaluate_live_board() {
        let s = session(Difficulty::Hard, 9);
        let human = s.evaluate(Side::Human).unwrap();
        assert_eq!(human, -s.evaluate(Side::Computer).unwrap());
    }

    #[test]
    fn test_invalid_tile() {
        let mut s = session(Difficulty::Hard, 8);
        assert_eq!(
            s.play_human(16).unwrap_err(),
            EngineError::InvalidTileIndex { tile: 16, tiles: 16 }
        );
    }
}
