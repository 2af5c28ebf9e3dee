//! Item snapshot types consumed by the selector

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::elo::DEFAULT_RATING;

/// Stable identifier for an item
///
/// Identifiers are shared between the item snapshot and the feature map, and
/// their natural ordering is used for every deterministic tie-break.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item({})", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

/// Whether the user has seen an item
///
/// Items marked `NotSeen` are excluded from the candidate pool while at least
/// two other items remain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SeenState {
    #[default]
    Unknown,
    Seen,
    NotSeen,
}

/// Rating state of a single item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatedItem {
    /// Stable identifier
    pub id: ItemId,
    /// Current Elo-style rating
    pub rating: f64,
    /// Number of recorded comparisons involving this item
    pub comparisons_count: u32,
    /// When this item was last part of a recorded pick
    #[serde(default)]
    pub last_compared_at: Option<DateTime<Utc>>,
    /// Seen / not-seen marker
    #[serde(default)]
    pub seen_state: SeenState,
    /// Categorical tags (genres), used only for the diversity bonus
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RatedItem {
    /// Create an unrated item with the default rating
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            rating: DEFAULT_RATING,
            comparisons_count: 0,
            last_compared_at: None,
            seen_state: SeenState::Unknown,
            tags: Vec::new(),
        }
    }

    /// Set the categorical tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rating
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Set the comparison count
    pub fn with_comparisons(mut self, count: u32) -> Self {
        self.comparisons_count = count;
        self
    }

    /// Set the seen state
    pub fn with_seen_state(mut self, state: SeenState) -> Self {
        self.seen_state = state;
        self
    }

    /// Whether the item may enter the preferred candidate pool
    pub fn is_eligible(&self) -> bool {
        self.seen_state != SeenState::NotSeen
    }

    /// Book-keeping after the item took part in a recorded pick
    pub fn record_comparison(&mut self, rating: f64, at: DateTime<Utc>) {
        self.rating = rating;
        self.comparisons_count += 1;
        self.last_compared_at = Some(at);
        self.seen_state = SeenState::Seen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_defaults() {
        let item = RatedItem::new(7);
        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.rating, 1500.0);
        assert_eq!(item.comparisons_count, 0);
        assert_eq!(item.seen_state, SeenState::Unknown);
        assert!(item.is_eligible());
    }

    #[test]
    fn test_record_comparison_marks_seen() {
        let at = Utc::now();
        let mut item = RatedItem::new(1).with_seen_state(SeenState::Unknown);
        item.record_comparison(1516.0, at);

        assert_eq!(item.rating, 1516.0);
        assert_eq!(item.comparisons_count, 1);
        assert_eq!(item.last_compared_at, Some(at));
        assert_eq!(item.seen_state, SeenState::Seen);
    }

    #[test]
    fn test_not_seen_is_ineligible() {
        let item = RatedItem::new(1).with_seen_state(SeenState::NotSeen);
        assert!(!item.is_eligible());
    }

    #[test]
    fn test_item_serde_defaults() {
        let item: RatedItem =
            serde_json::from_str(r#"{"id": 3, "rating": 1432.5, "comparisons_count": 2}"#)
                .unwrap();
        assert_eq!(item.id, ItemId(3));
        assert_eq!(item.seen_state, SeenState::Unknown);
        assert!(item.tags.is_empty());
        assert!(item.last_compared_at.is_none());
    }
}
