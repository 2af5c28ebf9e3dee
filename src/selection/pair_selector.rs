//! Choosing the next pair to show
//!
//! Each call builds a pool of eligible items, samples candidate pairs with a
//! mix of strategies, scores them on rating closeness, expected information
//! and novelty, and draws one randomesque. A bounded recency buffer stops the
//! same pair from coming back too soon.
//!
//! # Example
//!
//! ```rust
//! use taste_engine::prelude::*;
//!
//! let items: Vec<RatedItem> = (1..=8).map(RatedItem::new).collect();
//! let features = FeatureMap::new();
//! let mut rng = SeededRng::new(42);
//!
//! let mut selector = PairSelector::builder()
//!     .recency_buffer_size(5)
//!     .build()
//!     .unwrap();
//!
//! let pair = selector.next_pair(&items, None, &features, &mut rng).unwrap();
//! assert_ne!(pair.left, pair.right);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::cat::{CatConfig, TasteCatSelector};
use super::pair::{ItemPair, PairKey, ScoredPair};
use super::recency::RecencyBuffer;
use crate::axes::FeatureMap;
use crate::error::{TasteError, TasteResult};
use crate::model::profile::DEFAULT_SIGMA_SCALE;
use crate::model::TasteProfile;
use crate::rating::elo::EloRanker;
use crate::rating::item::RatedItem;
use crate::rating::ItemId;

/// Upper bound on [`PairSelectorConfig::candidate_pool_size`]
pub const MAX_CANDIDATE_POOL_SIZE: usize = 500;

/// Upper bound on [`PairSelectorConfig::informative_sample_size`]
pub const MAX_INFORMATIVE_SAMPLE_SIZE: usize = 500;

/// Tunables for [`PairSelector`]
///
/// Both sample sizes are capped so the cost of one call stays bounded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairSelectorConfig {
    /// Probability of sampling a candidate in informative mode
    pub informative_probability: f64,
    /// Probability of sampling a candidate in challenge mode; the rest is random
    pub challenge_probability: f64,
    /// Candidate pairs sampled per call
    pub candidate_pool_size: usize,
    /// Random pairs examined per informative candidate
    pub informative_sample_size: usize,
    /// Rank distance that still counts as a challenge neighbour
    pub challenge_neighbor_range: usize,
    /// Least-compared neighbours considered as challenge opponents
    pub challenge_pick_limit: usize,
    /// How many of the highest-rated items can anchor a challenge
    pub top_ranked_limit: usize,
    /// Random attempts before the exhaustive scan
    pub max_fallback_attempts: usize,
    pub rank_weight: f64,
    pub trait_weight: f64,
    pub explore_weight: f64,
    /// Bonus added to the rank score of challenge pairs
    pub challenge_boost: f64,
    /// Number of recent pair keys excluded from selection
    pub recency_buffer_size: usize,
}

impl Default for PairSelectorConfig {
    fn default() -> Self {
        Self {
            informative_probability: 0.7,
            challenge_probability: 0.2,
            candidate_pool_size: 60,
            informative_sample_size: 30,
            challenge_neighbor_range: 4,
            challenge_pick_limit: 3,
            top_ranked_limit: 10,
            max_fallback_attempts: 12,
            rank_weight: 0.55,
            trait_weight: 0.35,
            explore_weight: 0.10,
            challenge_boost: 0.15,
            recency_buffer_size: 50,
        }
    }
}

impl PairSelectorConfig {
    pub fn validate(&self) -> TasteResult<()> {
        let probabilities = [
            ("informative_probability", self.informative_probability),
            ("challenge_probability", self.challenge_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TasteError::Configuration(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.informative_probability + self.challenge_probability > 1.0 + 1e-9 {
            return Err(TasteError::Configuration(format!(
                "mode probabilities sum to {}, which exceeds 1",
                self.informative_probability + self.challenge_probability
            )));
        }

        let weights = [
            ("rank_weight", self.rank_weight),
            ("trait_weight", self.trait_weight),
            ("explore_weight", self.explore_weight),
            ("challenge_boost", self.challenge_boost),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(TasteError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let counts = [
            ("challenge_pick_limit", self.challenge_pick_limit),
            ("top_ranked_limit", self.top_ranked_limit),
            ("recency_buffer_size", self.recency_buffer_size),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(TasteError::Configuration(format!("{} must be positive", name)));
            }
        }

        let sample_sizes = [
            ("candidate_pool_size", self.candidate_pool_size, MAX_CANDIDATE_POOL_SIZE),
            ("informative_sample_size", self.informative_sample_size, MAX_INFORMATIVE_SAMPLE_SIZE),
        ];
        for (name, value, max) in sample_sizes {
            if value > max {
                return Err(TasteError::Configuration(format!(
                    "{} must be at most {}, got {}",
                    name, max, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SamplingMode {
    Informative,
    Challenge,
    Random,
}

/// Candidate pair borrowing from the pool
#[derive(Clone, Copy)]
struct Candidate<'a> {
    left: &'a RatedItem,
    right: &'a RatedItem,
}

impl<'a> Candidate<'a> {
    fn pair(&self) -> Option<ItemPair> {
        ItemPair::new(self.left.id, self.right.id)
    }

    fn expected_score(&self) -> f64 {
        EloRanker::expected_score(self.left.rating, self.right.rating)
    }
}

/// Stateful pair selector
///
/// Owns the recency buffer; a single caller drives it.
#[derive(Clone, Debug, PartialEq)]
pub struct PairSelector {
    config: PairSelectorConfig,
    cat: TasteCatSelector,
    recent: RecencyBuffer,
    sigma_scale: f64,
}

impl Default for PairSelector {
    fn default() -> Self {
        Self::new(PairSelectorConfig::default(), CatConfig::default(), DEFAULT_SIGMA_SCALE)
    }
}

impl PairSelector {
    /// Create a selector without validating the configuration
    pub fn new(config: PairSelectorConfig, cat: CatConfig, sigma_scale: f64) -> Self {
        let recent = RecencyBuffer::new(config.recency_buffer_size);
        Self {
            config,
            cat: TasteCatSelector::new(cat),
            recent,
            sigma_scale,
        }
    }

    pub fn builder() -> PairSelectorBuilder {
        PairSelectorBuilder::new()
    }

    pub fn config(&self) -> &PairSelectorConfig {
        &self.config
    }

    pub fn cat(&self) -> &TasteCatSelector {
        &self.cat
    }

    pub fn recent(&self) -> &RecencyBuffer {
        &self.recent
    }

    pub fn sigma_scale(&self) -> f64 {
        self.sigma_scale
    }

    /// Forget every recently offered pair
    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    /// Offer the next pair, or `None` when fewer than two items are available
    ///
    /// Items marked not-seen are skipped as long as two others remain.
    /// Missing feature vectors count as zero.
    pub fn next_pair<R: Rng>(
        &mut self,
        items: &[RatedItem],
        profile: Option<&TasteProfile>,
        features: &FeatureMap,
        rng: &mut R,
    ) -> Option<ItemPair> {
        let eligible: Vec<&RatedItem> = items.iter().filter(|item| item.is_eligible()).collect();
        let pool: Vec<&RatedItem> = if eligible.len() >= 2 {
            eligible
        } else {
            items.iter().collect()
        };
        if pool.len() < 2 {
            debug!(items = items.len(), "not enough items to form a pair");
            return None;
        }

        let mut ranked = pool.clone();
        ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating).then_with(|| a.id.cmp(&b.id)));
        let rank_index: HashMap<ItemId, usize> = ranked
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id, index))
            .collect();

        let candidates = self.sample_candidates(&pool, &ranked, rng);
        let is_warmup = profile
            .map(|p| self.cat.is_warmup(p, self.sigma_scale))
            .unwrap_or(false);

        let mut scored: BTreeMap<PairKey, ScoredPair> = BTreeMap::new();
        for candidate in &candidates {
            let Some(pair) = candidate.pair() else {
                continue;
            };
            let key = pair.key();
            if self.recent.contains(&key) {
                continue;
            }

            let rank_score = self.rank_score(candidate, &rank_index);
            let trait_score = self.cat.trait_score(
                candidate.left,
                candidate.right,
                profile,
                features,
                is_warmup,
            );
            let novelty = novelty_score(candidate);
            let total = self.config.rank_weight * rank_score
                + self.config.trait_weight * trait_score
                + self.config.explore_weight * novelty;

            match scored.get(&key) {
                Some(existing) if existing.score >= total => {}
                _ => {
                    scored.insert(key, ScoredPair::new(pair, total));
                }
            }
        }

        debug!(
            pool = pool.len(),
            sampled = candidates.len(),
            survivors = scored.len(),
            is_warmup,
            "scored candidate pairs"
        );

        let picked = self
            .cat
            .randomesque_pick(scored.into_values().collect(), rng)
            .or_else(|| self.fallback_pair(&pool, rng));

        if let Some(pair) = picked {
            trace!(left = %pair.left, right = %pair.right, key = %pair.key(), "offering pair");
            self.recent.record(pair.key());
        }
        picked
    }

    fn sample_candidates<'a, R: Rng>(
        &self,
        pool: &[&'a RatedItem],
        ranked: &[&'a RatedItem],
        rng: &mut R,
    ) -> Vec<Candidate<'a>> {
        let mut candidates = Vec::with_capacity(self.config.candidate_pool_size);
        for _ in 0..self.config.candidate_pool_size {
            let candidate = match self.pick_mode(rng) {
                SamplingMode::Informative => self.informative_pair(pool, rng),
                SamplingMode::Challenge => self.challenge_pair(pool, ranked, rng),
                SamplingMode::Random => random_pair(pool, rng),
            };
            if let Some(candidate) = candidate {
                candidates.push(candidate);
            }
        }
        candidates
    }

    fn pick_mode<R: Rng>(&self, rng: &mut R) -> SamplingMode {
        let roll: f64 = rng.gen();
        if roll < self.config.informative_probability {
            SamplingMode::Informative
        } else if roll < self.config.informative_probability + self.config.challenge_probability {
            SamplingMode::Challenge
        } else {
            SamplingMode::Random
        }
    }

    /// Closest expected score to a coin flip among several random pairs
    fn informative_pair<'a, R: Rng>(&self, pool: &[&'a RatedItem], rng: &mut R) -> Option<Candidate<'a>> {
        let samples = self.config.informative_sample_size.min(pool.len() * 2);
        let mut best: Option<(Candidate<'a>, f64)> = None;

        for _ in 0..samples {
            let Some(candidate) = random_pair(pool, rng) else {
                continue;
            };
            let closeness = (0.5 - candidate.expected_score()).abs();
            match best {
                Some((_, best_closeness)) if closeness >= best_closeness => {}
                _ => best = Some((candidate, closeness)),
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    /// A top-ranked item against one of its least-compared rank neighbours
    fn challenge_pair<'a, R: Rng>(
        &self,
        pool: &[&'a RatedItem],
        ranked: &[&'a RatedItem],
        rng: &mut R,
    ) -> Option<Candidate<'a>> {
        let top_count = self.config.top_ranked_limit.min(ranked.len());
        if top_count == 0 {
            return None;
        }
        let top_position = rng.gen_range(0..top_count);
        let top = ranked[top_position];

        let range = self.config.challenge_neighbor_range;
        let start = top_position.saturating_sub(range);
        let end = (top_position + range).min(ranked.len() - 1);
        let mut neighbors: Vec<&'a RatedItem> = ranked[start..=end]
            .iter()
            .copied()
            .filter(|item| item.id != top.id)
            .collect();
        if neighbors.is_empty() {
            return random_pair(pool, rng);
        }

        neighbors.sort_by(|a, b| {
            a.comparisons_count
                .cmp(&b.comparisons_count)
                .then_with(|| a.id.cmp(&b.id))
        });
        let pick_count = self.config.challenge_pick_limit.min(neighbors.len()).max(1);
        let opponent = neighbors[rng.gen_range(0..pick_count)];

        if rng.gen::<bool>() {
            Some(Candidate {
                left: top,
                right: opponent,
            })
        } else {
            Some(Candidate {
                left: opponent,
                right: top,
            })
        }
    }

    fn rank_score(&self, candidate: &Candidate<'_>, rank_index: &HashMap<ItemId, usize>) -> f64 {
        let closeness = 1.0 - (0.5 - candidate.expected_score()).abs() / 0.5;
        let bonus = if self.is_challenge_pair(candidate, rank_index) {
            self.config.challenge_boost
        } else {
            0.0
        };
        (closeness + bonus).clamp(0.0, 1.0)
    }

    /// Either side among the top-ranked items, with the other within the neighbour window
    fn is_challenge_pair(&self, candidate: &Candidate<'_>, rank_index: &HashMap<ItemId, usize>) -> bool {
        let (Some(&left), Some(&right)) = (
            rank_index.get(&candidate.left.id),
            rank_index.get(&candidate.right.id),
        ) else {
            return false;
        };
        let top = self.config.top_ranked_limit;
        (left < top || right < top) && left.abs_diff(right) <= self.config.challenge_neighbor_range
    }

    fn fallback_pair<R: Rng>(&self, pool: &[&RatedItem], rng: &mut R) -> Option<ItemPair> {
        for _ in 0..self.config.max_fallback_attempts {
            let Some(pair) = random_pair(pool, rng).and_then(|c| c.pair()) else {
                continue;
            };
            if !self.recent.contains(&pair.key()) {
                debug!(key = %pair.key(), "random fallback pair");
                return Some(pair);
            }
        }

        let mut sorted: Vec<ItemId> = pool.iter().map(|item| item.id).collect();
        sorted.sort();
        sorted.dedup();

        for (i, &left) in sorted.iter().enumerate() {
            for &right in &sorted[i + 1..] {
                let key = PairKey::new(left, right);
                if !self.recent.contains(&key) {
                    debug!(%key, "exhaustive fallback pair");
                    return Some(ItemPair { left, right });
                }
            }
        }

        // Every pool pair is recent: reuse the one offered longest ago
        let stale = self
            .recent
            .iter()
            .find(|key| sorted.binary_search(&key.low()).is_ok() && sorted.binary_search(&key.high()).is_ok())
            .copied();
        if let Some(key) = stale {
            debug!(%key, "all pairs recent, reusing oldest");
        }
        stale.and_then(|key| ItemPair::new(key.low(), key.high()))
    }
}

/// Uniform pair of distinct positions in a slice of length `len`
pub(crate) fn random_indices<R: Rng>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let first = rng.gen_range(0..len);
    let mut second = rng.gen_range(0..len - 1);
    if second >= first {
        second += 1;
    }
    Some((first, second))
}

fn random_pair<'a, R: Rng>(pool: &[&'a RatedItem], rng: &mut R) -> Option<Candidate<'a>> {
    random_indices(pool.len(), rng).map(|(first, second)| Candidate {
        left: pool[first],
        right: pool[second],
    })
}

fn novelty_score(candidate: &Candidate<'_>) -> f64 {
    let fewest = candidate
        .left
        .comparisons_count
        .min(candidate.right.comparisons_count);
    (1.0 / (1.0 + fewest as f64)).clamp(0.0, 1.0)
}

/// Fluent builder for [`PairSelector`]
#[derive(Clone, Debug)]
pub struct PairSelectorBuilder {
    config: PairSelectorConfig,
    cat: CatConfig,
    sigma_scale: f64,
}

impl Default for PairSelectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PairSelectorBuilder {
    pub fn new() -> Self {
        Self {
            config: PairSelectorConfig::default(),
            cat: CatConfig::default(),
            sigma_scale: DEFAULT_SIGMA_SCALE,
        }
    }

    /// Replace the whole selector configuration
    pub fn config(mut self, config: PairSelectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the scoring configuration
    pub fn cat_config(mut self, cat: CatConfig) -> Self {
        self.cat = cat;
        self
    }

    /// Set the informative and challenge sampling probabilities
    pub fn mode_probabilities(mut self, informative: f64, challenge: f64) -> Self {
        self.config.informative_probability = informative;
        self.config.challenge_probability = challenge;
        self
    }

    /// Set the number of candidates sampled per call
    pub fn candidate_pool_size(mut self, size: usize) -> Self {
        self.config.candidate_pool_size = size;
        self
    }

    /// Set the rank, trait and exploration weights
    pub fn score_weights(mut self, rank: f64, trait_weight: f64, explore: f64) -> Self {
        self.config.rank_weight = rank;
        self.config.trait_weight = trait_weight;
        self.config.explore_weight = explore;
        self
    }

    /// Set the recency buffer capacity
    pub fn recency_buffer_size(mut self, size: usize) -> Self {
        self.config.recency_buffer_size = size;
        self
    }

    /// Set the prior covariance scale used for warm-up detection
    pub fn sigma_scale(mut self, scale: f64) -> Self {
        self.sigma_scale = scale;
        self
    }

    pub fn build(self) -> TasteResult<PairSelector> {
        self.config.validate()?;
        self.cat.validate()?;
        if !(self.sigma_scale > 0.0 && self.sigma_scale.is_finite()) {
            return Err(TasteError::Configuration(format!(
                "sigma_scale must be positive, got {}",
                self.sigma_scale
            )));
        }
        Ok(PairSelector::new(self.config, self.cat, self.sigma_scale))
    }
}
