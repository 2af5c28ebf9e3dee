//! Elo-style pairwise rating
//!
//! Ratings are updated after every forced-choice pick using the classic
//! logistic expected-score curve on a 400-point scale. There are no draws:
//! the user must pick one side.

use serde::{Deserialize, Serialize};

/// Rating assigned to an item that has never been compared
pub const DEFAULT_RATING: f64 = 1500.0;

/// Default update factor
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Ratings of both participants after a pick
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub winner: f64,
    pub loser: f64,
}

/// Stateless Elo rating tracker
#[derive(Clone, Copy, Debug, Default)]
pub struct EloRanker;

impl EloRanker {
    /// Probability that an item rated `rating` beats one rated `opponent_rating`
    pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((opponent_rating - rating) / 400.0))
    }

    /// New ratings after `winner_rating` beat `loser_rating`
    pub fn updated_ratings(winner_rating: f64, loser_rating: f64, k_factor: f64) -> RatingUpdate {
        let expected_winner = Self::expected_score(winner_rating, loser_rating);
        let expected_loser = 1.0 - expected_winner;

        RatingUpdate {
            winner: winner_rating + k_factor * (1.0 - expected_winner),
            loser: loser_rating + k_factor * (0.0 - expected_loser),
        }
    }
}
