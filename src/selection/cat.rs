//! Adaptive pair scoring in the style of computerized adaptive testing
//!
//! Each candidate pair is scored by how much it would sharpen the taste
//! posterior, blended with a diversity term that favours under-explored axes
//! and pairs spanning different tags. The final choice is randomesque: a
//! weighted draw among the best few candidates rather than always the best.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::pair::{ItemPair, ScoredPair};
use crate::axes::{FeatureMap, AXIS_COUNT};
use crate::error::{TasteError, TasteResult};
use crate::model::forced_choice::choice_information;
use crate::model::TasteProfile;
use crate::rating::item::RatedItem;

/// Tunables for [`TasteCatSelector`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatConfig {
    /// Profiles with fewer comparisons than this are warming up
    pub warmup_comparisons: u64,
    /// Profiles below this confidence are warming up
    pub warmup_confidence_threshold: f64,
    pub warmup_gain_weight: f64,
    pub warmup_diversity_weight: f64,
    pub steady_gain_weight: f64,
    pub steady_diversity_weight: f64,
    /// Share of the diversity term given to under-explored axes
    pub axis_weight: f64,
    /// Share of the diversity term given to tag variety
    pub genre_weight: f64,
    /// Number of top candidates entering the randomesque draw
    pub randomesque_top_k: usize,
    /// Floor applied to every weight in the randomesque draw
    pub weight_floor: f64,
}

impl Default for CatConfig {
    fn default() -> Self {
        Self {
            warmup_comparisons: 10,
            warmup_confidence_threshold: 0.2,
            warmup_gain_weight: 0.6,
            warmup_diversity_weight: 0.4,
            steady_gain_weight: 0.85,
            steady_diversity_weight: 0.15,
            axis_weight: 0.7,
            genre_weight: 0.3,
            randomesque_top_k: 6,
            weight_floor: 1e-4,
        }
    }
}

impl CatConfig {
    pub fn validate(&self) -> TasteResult<()> {
        let weights = [
            ("warmup_gain_weight", self.warmup_gain_weight),
            ("warmup_diversity_weight", self.warmup_diversity_weight),
            ("steady_gain_weight", self.steady_gain_weight),
            ("steady_diversity_weight", self.steady_diversity_weight),
            ("axis_weight", self.axis_weight),
            ("genre_weight", self.genre_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(TasteError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.warmup_confidence_threshold) {
            return Err(TasteError::Configuration(format!(
                "warmup_confidence_threshold must be in [0, 1], got {}",
                self.warmup_confidence_threshold
            )));
        }
        if self.randomesque_top_k == 0 {
            return Err(TasteError::Configuration(
                "randomesque_top_k must be positive".to_string(),
            ));
        }
        if !(self.weight_floor > 0.0 && self.weight_floor.is_finite()) {
            return Err(TasteError::Configuration(format!(
                "weight_floor must be positive, got {}",
                self.weight_floor
            )));
        }
        Ok(())
    }
}

/// Scores candidate pairs against the current taste posterior
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TasteCatSelector {
    config: CatConfig,
}

impl TasteCatSelector {
    pub fn new(config: CatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatConfig {
        &self.config
    }

    /// Whether the profile is still too uncertain for gain-driven selection
    pub fn is_warmup(&self, profile: &TasteProfile, sigma_scale: f64) -> bool {
        profile.comparisons_count() < self.config.warmup_comparisons
            || profile.confidence(sigma_scale) < self.config.warmup_confidence_threshold
    }

    /// Trait-driven score in `[0, 1]` for showing `left` against `right`
    ///
    /// Without a profile there is nothing to learn from yet and the score is 0.
    pub fn trait_score(
        &self,
        left: &RatedItem,
        right: &RatedItem,
        profile: Option<&TasteProfile>,
        features: &FeatureMap,
        is_warmup: bool,
    ) -> f64 {
        let Some(profile) = profile else {
            return 0.0;
        };

        let delta = features.delta(left.id, right.id);
        let info = choice_information(profile, &delta);
        let gain = (1.0 + info.alpha * info.quad.max(0.0)).ln();
        let normalized_gain = 1.0 - (-gain).exp();

        let mut axis_sum = 0.0;
        for i in 0..AXIS_COUNT {
            axis_sum += delta[i].abs() / (1.0 + profile.axis_info()[i]);
        }
        let axis_score = axis_sum / (AXIS_COUNT as f64 * 2.0);
        let genre_score = tag_variety(&left.tags, &right.tags);
        let diversity = (self.config.axis_weight * axis_score
            + self.config.genre_weight * genre_score)
            .clamp(0.0, 1.0);

        let (gain_weight, diversity_weight) = if is_warmup {
            (self.config.warmup_gain_weight, self.config.warmup_diversity_weight)
        } else {
            (self.config.steady_gain_weight, self.config.steady_diversity_weight)
        };
        (gain_weight * normalized_gain + diversity_weight * diversity).clamp(0.0, 1.0)
    }

    /// Weighted draw among the top-K scored candidates
    ///
    /// Candidates are ranked by descending score with ties broken by ascending
    /// pair key, so the outcome depends only on the input and the RNG state.
    pub fn randomesque_pick<R: Rng>(&self, mut scored: Vec<ScoredPair>, rng: &mut R) -> Option<ItemPair> {
        if scored.is_empty() {
            return None;
        }

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.pair.key().cmp(&b.pair.key()))
        });
        scored.truncate(self.config.randomesque_top_k.max(1));

        let weights: Vec<f64> = scored
            .iter()
            .map(|c| c.score.max(self.config.weight_floor))
            .collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            let index = rng.gen_range(0..scored.len());
            return Some(scored[index].pair);
        }

        let roll = rng.gen_range(0.0..total);
        let mut running = 0.0;
        for (candidate, weight) in scored.iter().zip(&weights) {
            running += weight;
            if roll <= running {
                return Some(candidate.pair);
            }
        }
        scored.last().map(|c| c.pair)
    }
}

/// Distinct tags over total tags; 0 when neither item is tagged
fn tag_variety(left: &[String], right: &[String]) -> f64 {
    let union: HashSet<&str> = left.iter().chain(right).map(String::as_str).collect();
    let total = (left.len() + right.len()).max(1);
    union.len() as f64 / total as f64
}
