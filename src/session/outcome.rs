//! Answers to a comparison and the log entries they produce

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rating::ItemId;
use crate::selection::ItemPair;

/// What the user did with an offered pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComparisonOutcome {
    /// Picked the left item
    Left,
    /// Picked the right item
    Right,
    /// Declined to answer
    Skip,
    /// Has not seen the left item
    LeftNotSeen,
    /// Has not seen the right item
    RightNotSeen,
}

impl ComparisonOutcome {
    /// `Some(true)` for a left pick, `Some(false)` for a right pick
    pub fn chose_left(self) -> Option<bool> {
        match self {
            Self::Left => Some(true),
            Self::Right => Some(false),
            _ => None,
        }
    }

    pub fn is_pick(self) -> bool {
        self.chose_left().is_some()
    }

    /// The item within `pair` this outcome selected, if any
    pub fn selected(self, pair: &ItemPair) -> Option<ItemId> {
        match self.chose_left()? {
            true => Some(pair.left),
            false => Some(pair.right),
        }
    }

    /// The item within `pair` this outcome marks as not seen, if any
    pub fn not_seen(self, pair: &ItemPair) -> Option<ItemId> {
        match self {
            Self::LeftNotSeen => Some(pair.left),
            Self::RightNotSeen => Some(pair.right),
            _ => None,
        }
    }
}

/// One recorded answer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEvent {
    pub left: ItemId,
    pub right: ItemId,
    /// The picked item; `None` for skips and not-seen answers
    pub selected: Option<ItemId>,
    pub outcome: ComparisonOutcome,
    pub at: DateTime<Utc>,
}

impl ComparisonEvent {
    pub fn new(pair: ItemPair, outcome: ComparisonOutcome, at: DateTime<Utc>) -> Self {
        Self {
            left: pair.left,
            right: pair.right,
            selected: outcome.selected(&pair),
            outcome,
            at,
        }
    }

    pub fn pair(&self) -> Option<ItemPair> {
        ItemPair::new(self.left, self.right)
    }
}
