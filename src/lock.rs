//! Short-term move locks (a small tabu list).
//!
//! Every activated tile is appended to a bounded queue. While a tile is in the
//! queue it is "locked"; how that restricts play depends on the configured
//! [`LockPolicy`](crate::config::LockPolicy). The queue keeps greedy play from
//! ping-ponging on the same one or two tiles.

use std::collections::VecDeque;

/// Bounded queue of recently activated tiles, oldest at the head.
///
/// A tile appears at most once; re-recording it moves it to the tail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LockMemory {
    capacity: usize,
    queue: VecDeque<usize>,
}

impl LockMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Lock `tile`, evicting the oldest entry when the queue overflows.
    pub fn record(&mut self, tile: usize) {
        if let Some(i) = self.position(tile) {
            self.queue.remove(i);
        }
        self.queue.push_back(tile);
        while self.queue.len() > self.capacity {
            self.queue.pop_front();
        }
    }

    #[inline]
    pub fn is_locked(&self, tile: usize) -> bool {
        self.queue.contains(&tile)
    }

    /// Moves until `tile` unlocks once the queue is full: 1 for the head,
    /// 0 when the tile is not locked.
    pub fn countdown(&self, tile: usize) -> usize {
        self.position(tile).map_or(0, |i| i + 1)
    }

    /// Entries from the tail: 1 for the most recent tile, 0 when unlocked.
    pub fn age(&self, tile: usize) -> usize {
        self.position(tile).map_or(0, |i| self.queue.len() - i)
    }

    /// The least recently locked tile, next in line to unlock.
    pub fn oldest(&self) -> Option<usize> {
        self.queue.front().copied()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Locked tiles from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.queue.iter().copied()
    }

    fn position(&self, tile: usize) -> Option<usize> {
        self.queue.iter().position(|&t| t == tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lock() {
        let mut locks = LockMemory::new(3);
        assert!(!locks.is_locked(4));
        locks.record(4);
        assert!(locks.is_locked(4));
        assert_eq!(locks.countdown(4), 1);
        assert_eq!(locks.countdown(7), 0);
    }

    #[test]
    fn test_rerecord_moves_to_tail() {
        let mut locks = LockMemory::new(3);
        for tile in [5, 2, 5, 9] {
            locks.record(tile);
        }
        assert_eq!(locks.iter().collect::<Vec<_>>(), vec![2, 5, 9]);
        assert_eq!(locks.countdown(2), 1);
        assert_eq!(locks.countdown(5), 2);
        assert_eq!(locks.countdown(9), 3);
        assert_eq!(locks.age(2), 3);
        assert_eq!(locks.age(5), 2);
        assert_eq!(locks.age(9), 1);
    }

    #[test]
    fn test_eviction() {
        let mut locks = LockMemory::new(2);
        locks.record(1);
        locks.record(2);
        locks.record(3);
        assert!(!locks.is_locked(1));
        assert_eq!(locks.len(), 2);
        assert_eq!(locks.oldest(), Some(2));
    }

    #[test]
    fn test_clear() {
        let mut locks = LockMemory::new(4);
        locks.record(0);
        locks.record(1);
        locks.clear();
        assert!(locks.is_empty());
        assert_eq!(locks.oldest(), None);
        assert_eq!(locks.capacity(), 4);
    }
}
