//! Hypothetical moves on copies of the board.

use std::sync::Arc;

use crate::adjacency::AdjacencyModel;
use crate::board::BoardState;
use crate::config::LockPolicy;
use crate::error::EngineResult;
use crate::lock::LockMemory;

#[derive(Clone, Debug)]
pub struct Simulator {
    adjacency: Arc<AdjacencyModel>,
    policy: LockPolicy,
}

impl Simulator {
    pub fn new(adjacency: Arc<AdjacencyModel>, policy: LockPolicy) -> Self {
        Self { adjacency, policy }
    }

    /// `state` after activating `tile`, honouring the immunity policy.
    /// The input is never modified.
    pub fn simulate(
        &self,
        state: &BoardState,
        locks: &LockMemory,
        tile: usize,
    ) -> EngineResult<BoardState> {
        let mut next = state.clone();
        next.apply_move(&self.adjacency, tile, self.shield(locks))?;
        Ok(next)
    }

    /// The lock memory to shield flips with, if the policy asks for one.
    #[inline]
    pub fn shield<'a>(&self, locks: &'a LockMemory) -> Option<&'a LockMemory> {
        self.policy.shields().then_some(locks)
    }

    pub fn adjacency(&self) -> &AdjacencyModel {
        &self.adjacency
    }
}
