//! Pairs of items offered for comparison

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rating::ItemId;

/// Order-independent identity of a pair
///
/// Built from the two identifiers sorted ascending, so `(a, b)` and `(b, a)`
/// share a key. Keys order by `(low, high)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: ItemId,
    high: ItemId,
}

impl PairKey {
    pub fn new(a: ItemId, b: ItemId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn low(&self) -> ItemId {
        self.low
    }

    pub fn high(&self) -> ItemId {
        self.high
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low.0, self.high.0)
    }
}

/// An oriented pair: `left` is shown on the left, `right` on the right
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPair {
    pub left: ItemId,
    pub right: ItemId,
}

impl ItemPair {
    /// Returns `None` when both sides are the same item
    pub fn new(left: ItemId, right: ItemId) -> Option<Self> {
        (left != right).then_some(Self { left, right })
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(self.left, self.right)
    }

    /// The same pair with sides swapped
    pub fn flipped(&self) -> Self {
        Self {
            left: self.right,
            right: self.left,
        }
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.left == id || self.right == id
    }
}

/// A candidate pair with its selection score
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredPair {
    pub pair: ItemPair,
    pub score: f64,
}

impl ScoredPair {
    pub fn new(pair: ItemPair, score: f64) -> Self {
        Self { pair, score }
    }
}
