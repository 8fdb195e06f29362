//! Zero-sum board evaluation.

use std::sync::Arc;

use crate::board::{BoardState, Side};
use crate::config::LockPolicy;
use crate::constants::LOCKED_VALUE_MULTIPLIER;
use crate::error::{EngineError, EngineResult};
use crate::heuristic::HeuristicMap;
use crate::lock::LockMemory;

/// Scores a board as (own value) - (opponent value).
#[derive(Clone, Debug)]
pub struct Evaluator {
    heuristics: Arc<HeuristicMap>,
    policy: LockPolicy,
    base_value: f64,
}

impl Evaluator {
    pub fn new(heuristics: Arc<HeuristicMap>, policy: LockPolicy, base_value: f64) -> Self {
        Self {
            heuristics,
            policy,
            base_value,
        }
    }

    /// Value a single tile contributes to whoever owns it.
    #[inline]
    pub fn tile_value(&self, tile: usize, locks: &LockMemory) -> f64 {
        let value = self.base_value + self.heuristics.value(tile);
        if self.policy.shields() && locks.is_locked(tile) {
            value * LOCKED_VALUE_MULTIPLIER
        } else {
            value
        }
    }

    /// Differential score of `state` from `perspective`.
    ///
    /// `evaluate(s, Human) == -evaluate(s, Computer)` for every state. Fails
    /// with `InvalidGridSize` when `state` is not the size of the value map.
    pub fn evaluate(
        &self,
        state: &BoardState,
        locks: &LockMemory,
        perspective: Side,
    ) -> EngineResult<f64> {
        if state.tiles() != self.heuristics.tiles() {
            return Err(EngineError::InvalidGridSize(state.size));
        }
        let mut yellow = 0.0;
        let mut grey = 0.0;
        for (tile, &owner) in state.cells().iter().enumerate() {
            let value = self.tile_value(tile, locks);
            if owner {
                yellow += value;
            } else {
                grey += value;
            }
        }
        Ok(match perspective {
            Side::Human => yellow - grey,
            Side::Computer => grey - yellow,
        })
    }

    pub fn heuristics(&self) -> &HeuristicMap {
        &self.heuristics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator(policy: LockPolicy) -> Evaluator {
        Evaluator::new(Arc::new(HeuristicMap::positional(4)), policy, 0.0)
    }

    #[test]
    fn test_all_yellow_is_total_value() {
        let eval = evaluator(LockPolicy::Exclusion);
        let board = BoardState::from_owners(4, &[true; 16]).unwrap();
        let locks = LockMemory::new(4);
        assert_eq!(eval.evaluate(&board, &locks, Side::Human).unwrap(), 200.0);
        assert_eq!(eval.heuristics().total(), 200.0);
        assert_eq!(eval.evaluate(&board, &locks, Side::Computer).unwrap(), -200.0);
    }

    #[test]
    fn test_locked_bonus_only_under_immunity() {
        let board = BoardState::new(4);
        let mut locks = LockMemory::new(4);
        locks.record(0);

        let plain = evaluator(LockPolicy::Exclusion);
        assert_eq!(plain.evaluate(&board, &locks, Side::Computer).unwrap(), 200.0);

        let immune = evaluator(LockPolicy::Immunity);
        assert_eq!(immune.evaluate(&board, &locks, Side::Computer).unwrap(), 212.5);
    }

    #[test]
    fn test_base_value() {
        let eval = Evaluator::new(Arc::new(HeuristicMap::positional(4)), LockPolicy::None, 1.0);
        let board = BoardState::new(4);
        let locks = LockMemory::new(1);
        assert_eq!(eval.evaluate(&board, &locks, Side::Computer).unwrap(), 216.0);
    }

    #[test]
    fn test_board_size_must_match_values() {
        let eval = evaluator(LockPolicy::Exclusion);
        let locks = LockMemory::new(4);
        assert_eq!(
            eval.evaluate(&BoardState::new(5), &locks, Side::Human),
            Err(EngineError::InvalidGridSize(5))
        );
        assert_eq!(
            eval.evaluate(&BoardState::new(3), &locks, Side::Computer),
            Err(EngineError::InvalidGridSize(3))
        );
    }
}
