//! Convergence experiments against a synthetic user
//!
//! Each run starts from a fresh prior, lets a strategy choose every pair,
//! answers with the panel's logistic choice model and reports how far the
//! learned mean ends up from the truth. Pair choice and user answers draw
//! from separate generators, so two strategies run with the same seeds see
//! the same answer noise.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::panel::{rmse, SyntheticPanel};
use crate::error::{TasteError, TasteResult};
use crate::model::profile::DEFAULT_SIGMA_SCALE;
use crate::model::TasteProfile;
use crate::random::SeededRng;
use crate::rating::elo::{EloRanker, DEFAULT_K_FACTOR};
use crate::rating::item::RatedItem;
use crate::rating::ItemId;
use crate::selection::cat::{CatConfig, TasteCatSelector};
use crate::selection::pair_selector::{random_indices, PairSelector, PairSelectorConfig};
use crate::selection::{ItemPair, ScoredPair};

/// How pairs are chosen during a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Uniformly random distinct pairs
    UniformRandom,
    /// Random candidates ranked by trait score, drawn randomesque
    TraitDriven,
    /// The full [`PairSelector`], with ratings updated as the run goes
    FullPipeline,
}

/// Parameters of a simulation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Comparisons answered per run
    pub comparisons: usize,
    /// Random candidates scored per pick by [`Strategy::TraitDriven`]
    pub candidate_count: usize,
    /// Seed of the pair-choosing generator; the answer generator uses the next seed
    pub seed: u64,
    /// Clock of the run; comparison `i` is stamped `started_at + i` seconds
    pub started_at: DateTime<Utc>,
    pub sigma_scale: f64,
    pub elo_k_factor: f64,
    pub cat: CatConfig,
    pub selector: PairSelectorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            comparisons: 80,
            candidate_count: 40,
            seed: 77,
            started_at: DateTime::<Utc>::default(),
            sigma_scale: DEFAULT_SIGMA_SCALE,
            elo_k_factor: DEFAULT_K_FACTOR,
            cat: CatConfig::default(),
            selector: PairSelectorConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> TasteResult<()> {
        if self.candidate_count == 0 {
            return Err(TasteError::Configuration(
                "candidate_count must be positive".to_string(),
            ));
        }
        if !(self.sigma_scale > 0.0 && self.sigma_scale.is_finite()) {
            return Err(TasteError::Configuration(format!(
                "sigma_scale must be positive, got {}",
                self.sigma_scale
            )));
        }
        self.cat.validate()?;
        self.selector.validate()
    }
}

/// Outcome of one run
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationReport {
    pub strategy: Strategy,
    /// RMSE between the learned mean and the truth
    pub rmse: f64,
    /// Number of comparisons answered
    pub comparisons: usize,
    /// Final posterior
    pub profile: TasteProfile,
    /// Items as they stand at the end of the run
    pub items: Vec<RatedItem>,
}

/// Run one strategy against `panel`
pub fn run(strategy: Strategy, panel: &SyntheticPanel, config: &SimulationConfig) -> TasteResult<SimulationReport> {
    config.validate()?;
    if panel.items.len() < 2 {
        return Err(TasteError::Configuration(
            "a simulation needs at least two items".to_string(),
        ));
    }

    let mut pairing_rng = SeededRng::new(config.seed);
    let mut choice_rng = SeededRng::new(config.seed.wrapping_add(1));
    let cat = TasteCatSelector::new(config.cat.clone());
    let mut selector = PairSelector::new(config.selector.clone(), config.cat.clone(), config.sigma_scale);
    let mut items = panel.items.clone();
    let mut profile = TasteProfile::new(config.sigma_scale);

    for step in 0..config.comparisons {
        let pair = match strategy {
            Strategy::UniformRandom => uniform_pair(&items, &mut pairing_rng),
            Strategy::TraitDriven => {
                let is_warmup = cat.is_warmup(&profile, config.sigma_scale);
                let mut scored = Vec::with_capacity(config.candidate_count);
                for _ in 0..config.candidate_count {
                    let Some((left, right)) = random_indices(items.len(), &mut pairing_rng) else {
                        continue;
                    };
                    let Some(pair) = ItemPair::new(items[left].id, items[right].id) else {
                        continue;
                    };
                    let score = cat.trait_score(
                        &items[left],
                        &items[right],
                        Some(&profile),
                        &panel.features,
                        is_warmup,
                    );
                    scored.push(ScoredPair::new(pair, score));
                }
                let first = scored.first().map(|c| c.pair);
                cat.randomesque_pick(scored, &mut pairing_rng).or(first)
            }
            Strategy::FullPipeline => {
                selector.next_pair(&items, Some(&profile), &panel.features, &mut pairing_rng)
            }
        };
        let Some(pair) = pair else {
            return Err(TasteError::Configuration(
                "item identifiers must be distinct".to_string(),
            ));
        };

        let delta = panel.features.delta(pair.left, pair.right);
        let chose_left = panel.choose(&delta, &mut choice_rng);
        profile.update(&delta, chose_left);

        if strategy == Strategy::FullPipeline {
            let at = config.started_at + Duration::seconds(step as i64);
            apply_ratings(&mut items, pair, chose_left, config.elo_k_factor, at)?;
        }
    }

    let error = rmse(profile.mu(), &panel.truth);
    debug!(?strategy, rmse = error, comparisons = config.comparisons, "simulation finished");
    Ok(SimulationReport {
        strategy,
        rmse: error,
        comparisons: config.comparisons,
        profile,
        items,
    })
}

fn uniform_pair(items: &[RatedItem], rng: &mut SeededRng) -> Option<ItemPair> {
    random_indices(items.len(), rng).and_then(|(left, right)| ItemPair::new(items[left].id, items[right].id))
}

fn apply_ratings(
    items: &mut [RatedItem],
    pair: ItemPair,
    chose_left: bool,
    k_factor: f64,
    at: DateTime<Utc>,
) -> TasteResult<()> {
    let find = |id: ItemId| {
        items
            .iter()
            .position(|item| item.id == id)
            .ok_or(TasteError::UnknownItem(id))
    };
    let left = find(pair.left)?;
    let right = find(pair.right)?;
    let (winner, loser) = if chose_left { (left, right) } else { (right, left) };

    let update = EloRanker::updated_ratings(items[winner].rating, items[loser].rating, k_factor);
    items[winner].record_comparison(update.winner, at);
    items[loser].record_comparison(update.loser, at);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn panel() -> SyntheticPanel {
        SyntheticPanel::generate(40, &mut SeededRng::new(123))
    }

    #[test]
    fn test_runs_are_reproducible() {
        let panel = panel();
        let config = SimulationConfig::default();
        for strategy in [Strategy::UniformRandom, Strategy::TraitDriven, Strategy::FullPipeline] {
            let a = run(strategy, &panel, &config).unwrap();
            let b = run(strategy, &panel, &config).unwrap();
            assert_eq!(a.rmse, b.rmse);
            assert_eq!(a.profile, b.profile);
            assert_eq!(a.items, b.items);
            assert_eq!(a.profile.comparisons_count(), 80);
        }
    }

    #[test]
    fn test_full_pipeline_stamps_the_run_clock() {
        let panel = panel();
        let config = SimulationConfig {
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            ..SimulationConfig::default()
        };
        let report = run(Strategy::FullPipeline, &panel, &config).unwrap();
        let end = config.started_at + Duration::seconds(config.comparisons as i64);

        let stamps: Vec<DateTime<Utc>> = report
            .items
            .iter()
            .filter_map(|item| item.last_compared_at)
            .collect();
        assert!(!stamps.is_empty());
        assert!(stamps.iter().all(|at| *at >= config.started_at && *at < end));
        assert_eq!(run(Strategy::FullPipeline, &panel, &config).unwrap().items, report.items);
    }

    #[test]
    fn test_original_setup_beats_random_by_ten_percent() {
        let panel = panel();
        let config = SimulationConfig::default();
        let random = run(Strategy::UniformRandom, &panel, &config).unwrap().rmse;
        for strategy in [Strategy::TraitDriven, Strategy::FullPipeline] {
            let adaptive = run(strategy, &panel, &config).unwrap().rmse;
            assert!(
                adaptive < random * 0.9,
                "{:?} RMSE {} not 10% below random RMSE {}",
                strategy,
                adaptive,
                random
            );
        }
    }

    #[test]
    fn test_learning_beats_the_prior() {
        let panel = panel();
        let config = SimulationConfig::default();
        let prior_error = rmse(&crate::axes::AxisVector::zeros(), &panel.truth);
        let report = run(Strategy::TraitDriven, &panel, &config).unwrap();
        assert!(report.rmse < prior_error);
    }

    #[test]
    fn test_rejects_tiny_panel() {
        let panel = SyntheticPanel::generate(1, &mut SeededRng::new(1));
        assert!(run(Strategy::UniformRandom, &panel, &SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_zero_comparisons_leave_prior() {
        let panel = panel();
        let config = SimulationConfig {
            comparisons: 0,
            ..SimulationConfig::default()
        };
        let report = run(Strategy::FullPipeline, &panel, &config).unwrap();
        assert_eq!(report.profile, TasteProfile::new(1.0));
    }
}
