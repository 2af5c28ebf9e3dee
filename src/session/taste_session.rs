//! The single-writer owner of one user's elicitation state

use chrono::{DateTime, Utc};
use tracing::debug;

use super::outcome::{ComparisonEvent, ComparisonOutcome};
use super::snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
use crate::axes::FeatureMap;
use crate::config::EngineConfig;
use crate::error::{TasteError, TasteResult};
use crate::model::TasteProfile;
use crate::random::SeededRng;
use crate::rating::elo::EloRanker;
use crate::rating::item::{RatedItem, SeenState};
use crate::rating::ItemId;
use crate::selection::{ItemPair, PairSelector};

/// Drives the offer / answer loop for one user
///
/// Holds the item snapshot, the feature vectors, the taste profile, the
/// selector and the generator. The profile starts at the prior, so the very
/// first offer is already scored on expected information.
///
/// The event log keeps the last `max_history` events; older ones are dropped.
#[derive(Clone, Debug)]
pub struct TasteSession {
    config: EngineConfig,
    items: Vec<RatedItem>,
    features: FeatureMap,
    profile: TasteProfile,
    selector: PairSelector,
    rng: SeededRng,
    current: Option<ItemPair>,
    history: Vec<ComparisonEvent>,
}

impl TasteSession {
    pub fn new(
        config: EngineConfig,
        items: Vec<RatedItem>,
        features: FeatureMap,
        seed: u64,
    ) -> TasteResult<Self> {
        config.validate()?;
        let selector = config.build_selector()?;
        let profile = TasteProfile::new(config.sigma_scale);
        Ok(Self {
            config,
            items,
            features,
            profile,
            selector,
            rng: SeededRng::new(seed),
            current: None,
            history: Vec::new(),
        })
    }

    /// Rebuild a session from a snapshot
    ///
    /// The recency buffer is not part of a snapshot and starts empty. A
    /// snapshot without a profile resumes from the prior.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> TasteResult<Self> {
        snapshot.config.validate()?;
        let selector = snapshot.config.build_selector()?;
        let profile = snapshot
            .profile
            .unwrap_or_else(|| TasteProfile::new(snapshot.config.sigma_scale));
        let mut session = Self {
            config: snapshot.config,
            items: snapshot.items,
            features: snapshot.features,
            profile,
            selector,
            rng: snapshot.rng,
            current: snapshot.current,
            history: snapshot.history,
        };
        session.trim_history();
        Ok(session)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            config: self.config.clone(),
            items: self.items.clone(),
            features: self.features.clone(),
            profile: Some(self.profile.clone()),
            rng: self.rng.clone(),
            current: self.current,
            history: self.history.clone(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn items(&self) -> &[RatedItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&RatedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    pub fn profile(&self) -> &TasteProfile {
        &self.profile
    }

    pub fn history(&self) -> &[ComparisonEvent] {
        &self.history
    }

    pub fn current_pair(&self) -> Option<ItemPair> {
        self.current
    }

    pub fn selector(&self) -> &PairSelector {
        &self.selector
    }

    /// Add an unrated item at the configured initial rating
    pub fn add_item<I, S>(&mut self, id: ItemId, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let item = RatedItem::new(id)
            .with_rating(self.config.initial_rating)
            .with_tags(tags);
        self.items.push(item);
    }

    /// Replace the item snapshot, keeping the profile and history
    ///
    /// A pending pair that no longer refers to known items is dropped.
    pub fn set_items(&mut self, items: Vec<RatedItem>) {
        self.items = items;
        if let Some(pair) = self.current {
            if self.position(pair.left).is_err() || self.position(pair.right).is_err() {
                self.current = None;
            }
        }
    }

    pub fn set_features(&mut self, features: FeatureMap) {
        self.features = features;
    }

    /// Posterior confidence in `[0, 1]`; 0 before the first pick
    pub fn confidence(&self) -> f64 {
        self.profile.confidence(self.config.sigma_scale)
    }

    /// Draw the next pair and make it the pending one
    pub fn next_pair(&mut self) -> Option<ItemPair> {
        let pair = self.selector.next_pair(
            &self.items,
            Some(&self.profile),
            &self.features,
            &mut self.rng,
        );
        self.current = pair;
        pair
    }

    /// Record the answer to the pending pair now
    pub fn record(&mut self, outcome: ComparisonOutcome) -> TasteResult<ComparisonEvent> {
        self.record_at(outcome, Utc::now())
    }

    /// Record the answer to the pending pair with an explicit timestamp
    pub fn record_at(&mut self, outcome: ComparisonOutcome, at: DateTime<Utc>) -> TasteResult<ComparisonEvent> {
        let pair = self.current.ok_or(TasteError::NoActivePair)?;
        let event = self.apply(pair, outcome, at)?;
        self.current = None;
        Ok(event)
    }

    /// Record an answer for an arbitrary pair
    ///
    /// A pick updates both ratings, both comparison counts and timestamps,
    /// marks both items seen and updates the taste profile. A not-seen answer
    /// marks only that item. A skip changes nothing but the log.
    pub fn apply(
        &mut self,
        pair: ItemPair,
        outcome: ComparisonOutcome,
        at: DateTime<Utc>,
    ) -> TasteResult<ComparisonEvent> {
        let left = self.position(pair.left)?;
        let right = self.position(pair.right)?;

        if let Some(chose_left) = outcome.chose_left() {
            let (winner, loser) = if chose_left { (left, right) } else { (right, left) };
            let update = EloRanker::updated_ratings(
                self.items[winner].rating,
                self.items[loser].rating,
                self.config.elo_k_factor,
            );
            self.items[winner].record_comparison(update.winner, at);
            self.items[loser].record_comparison(update.loser, at);

            let delta = self.features.delta(pair.left, pair.right);
            self.profile.update(&delta, chose_left);
        } else if let Some(id) = outcome.not_seen(&pair) {
            let index = if id == pair.left { left } else { right };
            self.items[index].seen_state = SeenState::NotSeen;
        }

        let event = ComparisonEvent::new(pair, outcome, at);
        debug!(
            left = %pair.left,
            right = %pair.right,
            outcome = ?outcome,
            comparisons = self.profile.comparisons_count(),
            "recorded comparison"
        );
        self.history.push(event.clone());
        self.trim_history();
        Ok(event)
    }

    fn trim_history(&mut self) {
        let excess = self.history.len().saturating_sub(self.config.max_history);
        if excess > 0 {
            self.history.drain(..excess);
        }
    }

    fn position(&self, id: ItemId) -> TasteResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(TasteError::UnknownItem(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::FeatureVector;
    use approx::assert_abs_diff_eq;

    fn catalogue() -> (Vec<RatedItem>, FeatureMap) {
        let items: Vec<RatedItem> = (1..=6).map(RatedItem::new).collect();
        let features: FeatureMap = (1..=6u64)
            .map(|i| {
                let x = i as f64 / 6.0;
                (ItemId(i), FeatureVector::new([x, 0.0, -x, 0.0, 0.5 - x, 0.0]))
            })
            .collect();
        (items, features)
    }

    fn session() -> TasteSession {
        let (items, features) = catalogue();
        TasteSession::new(EngineConfig::default(), items, features, 42).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.elo_k_factor = 0.0;
        assert!(TasteSession::new(config, Vec::new(), FeatureMap::new(), 1).is_err());
    }

    #[test]
    fn test_record_without_pair() {
        let mut session = session();
        assert_eq!(
            session.record(ComparisonOutcome::Left),
            Err(TasteError::NoActivePair)
        );
    }

    #[test]
    fn test_pick_updates_ratings_and_profile() {
        let mut session = session();
        let pair = session.next_pair().unwrap();
        assert_eq!(session.profile().comparisons_count(), 0);

        let at = Utc::now();
        let event = session.record_at(ComparisonOutcome::Left, at).unwrap();
        assert_eq!(event.selected, Some(pair.left));
        assert!(session.current_pair().is_none());

        let winner = session.item(pair.left).unwrap();
        let loser = session.item(pair.right).unwrap();
        assert_abs_diff_eq!(winner.rating, 1516.0, epsilon = 1e-9);
        assert_abs_diff_eq!(loser.rating, 1484.0, epsilon = 1e-9);
        assert_eq!(winner.comparisons_count, 1);
        assert_eq!(loser.last_compared_at, Some(at));
        assert_eq!(loser.seen_state, SeenState::Seen);

        assert_eq!(session.profile().comparisons_count(), 1);
        assert!(session.confidence() >= 0.0);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_not_seen_marks_one_item() {
        let mut session = session();
        let pair = session.next_pair().unwrap();
        session.record(ComparisonOutcome::RightNotSeen).unwrap();

        assert_eq!(session.item(pair.right).unwrap().seen_state, SeenState::NotSeen);
        assert_eq!(session.item(pair.left).unwrap().seen_state, SeenState::Unknown);
        assert_eq!(session.item(pair.right).unwrap().rating, 1500.0);
        assert_eq!(session.profile(), &TasteProfile::new(1.0));
    }

    #[test]
    fn test_skip_only_logs() {
        let mut session = session();
        session.next_pair().unwrap();
        let before = session.items().to_vec();
        let event = session.record(ComparisonOutcome::Skip).unwrap();

        assert_eq!(event.selected, None);
        assert_eq!(session.items(), before.as_slice());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_unknown_item() {
        let mut session = session();
        let pair = ItemPair::new(ItemId(1), ItemId(99)).unwrap();
        assert_eq!(
            session.apply(pair, ComparisonOutcome::Left, Utc::now()),
            Err(TasteError::UnknownItem(ItemId(99)))
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_add_item_uses_initial_rating() {
        let mut config = EngineConfig::default();
        config.initial_rating = 1200.0;
        let mut session = TasteSession::new(config, Vec::new(), FeatureMap::new(), 3).unwrap();
        assert!(session.next_pair().is_none());

        session.add_item(ItemId(1), ["drama"]);
        session.add_item(ItemId(2), Vec::<String>::new());
        assert_eq!(session.item(ItemId(1)).unwrap().rating, 1200.0);
        assert!(session.next_pair().is_some());
    }

    #[test]
    fn test_set_items_drops_stale_pair() {
        let mut session = session();
        session.next_pair().unwrap();
        session.set_items(vec![RatedItem::new(50), RatedItem::new(51)]);
        assert!(session.current_pair().is_none());
    }

    #[test]
    fn test_snapshot_resumes_profile_and_rng() {
        let mut session = session();
        for _ in 0..5 {
            session.next_pair().unwrap();
            session.record(ComparisonOutcome::Left).unwrap();
        }

        let json = session.snapshot().to_json().unwrap();
        let restored = TasteSession::from_snapshot(SessionSnapshot::from_json(&json).unwrap()).unwrap();

        assert_eq!(restored.profile(), session.profile());
        assert_eq!(restored.items(), session.items());
        assert_eq!(restored.history(), session.history());
        assert_eq!(restored.rng, session.rng);
    }

    #[test]
    fn test_first_offer_uses_prior_profile() {
        for seed in [1, 7, 42, 1_000] {
            let (items, features) = catalogue();
            let config = EngineConfig::default();
            let mut selector = config.build_selector().unwrap();
            let prior = TasteProfile::new(config.sigma_scale);
            let mut rng = SeededRng::new(seed);
            let expected = selector.next_pair(&items, Some(&prior), &features, &mut rng);

            let mut session = TasteSession::new(config, items, features, seed).unwrap();
            assert_eq!(session.profile(), &prior);
            assert_eq!(session.next_pair(), expected);
        }
    }

    #[test]
    fn test_snapshot_without_profile_resumes_from_prior() {
        let mut snapshot = session().snapshot();
        snapshot.profile = None;
        let restored = TasteSession::from_snapshot(snapshot).unwrap();
        assert_eq!(restored.profile(), &TasteProfile::new(1.0));
    }

    #[test]
    fn test_history_keeps_latest_events() {
        let (items, features) = catalogue();
        let config = EngineConfig {
            max_history: 3,
            ..EngineConfig::default()
        };
        let mut session = TasteSession::new(config, items, features, 11).unwrap();
        let mut offered = Vec::new();
        for _ in 0..5 {
            offered.push(session.next_pair().unwrap());
            session.record(ComparisonOutcome::Skip).unwrap();
        }

        let kept: Vec<ItemPair> = session.history().iter().filter_map(|event| event.pair()).collect();
        assert_eq!(kept, offered[2..].to_vec());
        assert_eq!(session.snapshot().history.len(), 3);
    }
}
