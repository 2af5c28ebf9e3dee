//! Bounded memory of recently offered pairs

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::pair::PairKey;

/// FIFO of the most recent pair keys
///
/// Holds at most `capacity` keys; recording beyond that evicts the oldest.
/// Recording a key already present moves it to the newest position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecencyBuffer {
    capacity: usize,
    keys: VecDeque<PairKey>,
}

impl RecencyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            keys: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &PairKey) -> bool {
        self.keys.contains(key)
    }

    pub fn record(&mut self, key: PairKey) {
        if let Some(position) = self.keys.iter().position(|k| *k == key) {
            self.keys.remove(position);
        }
        self.keys.push_back(key);
        while self.keys.len() > self.capacity {
            self.keys.pop_front();
        }
    }

    /// Position of `key` from oldest (0) to newest, if present
    pub fn age_rank(&self, key: &PairKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Keys from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &PairKey> {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::ItemId;

    fn key(a: u64, b: u64) -> PairKey {
        PairKey::new(ItemId(a), ItemId(b))
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let mut buffer = RecencyBuffer::new(2);
        buffer.record(key(1, 2));
        buffer.record(key(1, 3));
        buffer.record(key(2, 3));

        assert_eq!(buffer.len(), 2);
        assert!(!buffer.contains(&key(1, 2)));
        assert!(buffer.contains(&key(3, 1)));
        assert!(buffer.contains(&key(2, 3)));
    }

    #[test]
    fn test_rerecord_moves_to_newest() {
        let mut buffer = RecencyBuffer::new(3);
        buffer.record(key(1, 2));
        buffer.record(key(1, 3));
        buffer.record(key(1, 2));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.age_rank(&key(1, 3)), Some(0));
        assert_eq!(buffer.age_rank(&key(1, 2)), Some(1));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut buffer = RecencyBuffer::new(0);
        buffer.record(key(1, 2));
        assert!(buffer.is_empty());
    }
}
