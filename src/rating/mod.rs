//! Pairwise rating of items
//!
//! Each item carries an Elo-style scalar rating alongside the bookkeeping the
//! pair selector needs: how often it has been compared and whether the user
//! has marked it as not seen.

pub mod elo;
pub mod item;

pub use item::ItemId;

/// Prelude for convenient imports
pub mod prelude {
    pub use super::elo::{EloRanker, RatingUpdate, DEFAULT_K_FACTOR, DEFAULT_RATING};
    pub use super::item::{ItemId, RatedItem, SeenState};
}
