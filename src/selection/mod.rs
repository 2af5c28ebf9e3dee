//! Adaptive pair selection
//!
//! This module decides which two items to show next. Candidate pairs are
//! sampled, scored against the current taste posterior and the item ratings,
//! and drawn randomesque from the best few.
//!
//! # Components
//!
//! - [`pair`]: oriented pairs and their order-independent keys
//! - [`recency`]: bounded buffer of recently offered pairs
//! - [`cat`]: information-gain and diversity scoring, randomesque draw
//! - [`pair_selector`]: the stateful orchestrator

pub mod cat;
pub mod pair;
pub mod pair_selector;
pub mod recency;

pub use pair::{ItemPair, PairKey, ScoredPair};
pub use pair_selector::PairSelector;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::cat::{CatConfig, TasteCatSelector};
    pub use super::pair::{ItemPair, PairKey, ScoredPair};
    pub use super::pair_selector::{PairSelector, PairSelectorBuilder, PairSelectorConfig};
    pub use super::recency::RecencyBuffer;
}
