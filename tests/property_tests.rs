//! Property-based tests for taste-engine
//!
//! Uses proptest to verify invariants and properties of the library.

use std::collections::HashSet;

use proptest::prelude::*;
use taste_engine::prelude::*;

fn catalogue(n: u64) -> (Vec<RatedItem>, FeatureMap) {
    let items: Vec<RatedItem> = (1..=n)
        .map(|i| RatedItem::new(i).with_rating(1450.0 + 7.0 * (i % 13) as f64))
        .collect();
    let features: FeatureMap = (1..=n)
        .map(|i| {
            let x = (i as f64 * 0.37).sin();
            let y = (i as f64 * 0.71).cos();
            (ItemId(i), FeatureVector::new([x, y, x * y, -x, 0.5 * y, x - y]))
        })
        .collect();
    (items, features)
}

proptest! {
    // ==================== Elo Properties ====================

    #[test]
    fn elo_winner_gains_loser_loses(
        winner in 500.0f64..2500.0,
        loser in 500.0f64..2500.0,
        k in 1.0f64..64.0
    ) {
        let update = EloRanker::updated_ratings(winner, loser, k);
        prop_assert!(update.winner > winner);
        prop_assert!(update.loser < loser);
        prop_assert!((update.winner + update.loser - winner - loser).abs() < 1e-9);
    }

    #[test]
    fn elo_expected_scores_sum_to_one(a in 0.0f64..3000.0, b in 0.0f64..3000.0) {
        let sum = EloRanker::expected_score(a, b) + EloRanker::expected_score(b, a);
        prop_assert!((sum - 1.0).abs() < 1e-12);
    }

    // ==================== Model Properties ====================

    #[test]
    fn update_never_grows_trace(
        deltas in prop::collection::vec(prop::collection::vec(-2.0f64..2.0, 6), 1..25),
        choices in prop::collection::vec(any::<bool>(), 25)
    ) {
        let mut profile = TasteProfile::new(1.0);
        for (delta, chose_left) in deltas.iter().zip(&choices) {
            let before = profile.trace();
            profile.update_from_slice(delta, *chose_left).unwrap();
            prop_assert!(profile.trace() <= before + 1e-12);
        }
        prop_assert_eq!(profile.comparisons_count(), deltas.len() as u64);
    }

    #[test]
    fn confidence_stays_in_unit_interval(
        deltas in prop::collection::vec(prop::collection::vec(-2.0f64..2.0, 6), 0..25),
        scale in 0.0f64..5.0
    ) {
        let mut profile = TasteProfile::new(1.0);
        for (i, delta) in deltas.iter().enumerate() {
            profile.update_from_slice(delta, i % 2 == 0).unwrap();
            let confidence = profile.confidence(scale);
            prop_assert!((0.0..=1.0).contains(&confidence));
        }
    }

    #[test]
    fn wrong_dimension_is_rejected(values in prop::collection::vec(-1.0f64..1.0, 0..12)) {
        let result = FeatureVector::try_from_slice(&values);
        prop_assert_eq!(result.is_ok(), values.len() == AXIS_COUNT);
    }

    // ==================== Selection Properties ====================

    #[test]
    fn no_pair_repeats_within_buffer(
        seed in any::<u64>(),
        n in 5u64..15,
        buffer in 1usize..10
    ) {
        let (items, features) = catalogue(n);
        let mut selector = PairSelector::builder()
            .recency_buffer_size(buffer)
            .build()
            .unwrap();
        let mut rng = SeededRng::new(seed);

        let keys: Vec<PairKey> = (0..30)
            .map(|_| selector.next_pair(&items, None, &features, &mut rng).unwrap().key())
            .collect();
        for window in keys.windows(buffer + 1) {
            let unique: HashSet<_> = window.iter().collect();
            prop_assert_eq!(unique.len(), window.len());
        }
    }

    #[test]
    fn identical_seeds_identical_pairs(seed in any::<u64>(), n in 2u64..12) {
        let (items, features) = catalogue(n);
        let mut profile = TasteProfile::new(1.0);
        profile.update(&features.delta(ItemId(1), ItemId(2)), true);

        let draw = || {
            let mut selector = PairSelector::default();
            let mut rng = SeededRng::new(seed);
            (0..10)
                .map(|_| selector.next_pair(&items, Some(&profile), &features, &mut rng))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(draw(), draw());
    }

    #[test]
    fn randomesque_picks_from_top_k(
        scores in prop::collection::vec(0.0f64..1.0, 1..20),
        seed in any::<u64>()
    ) {
        let selector = TasteCatSelector::default();
        let scored: Vec<ScoredPair> = scores
            .iter()
            .enumerate()
            .map(|(i, &score)| {
                let pair = ItemPair::new(ItemId(2 * i as u64), ItemId(2 * i as u64 + 1)).unwrap();
                ScoredPair::new(pair, score)
            })
            .collect();

        let mut ranked = scored.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.pair.key().cmp(&b.pair.key())));
        let top: HashSet<ItemPair> = ranked.iter().take(6).map(|c| c.pair).collect();

        let mut rng = SeededRng::new(seed);
        let pick = selector.randomesque_pick(scored, &mut rng).unwrap();
        prop_assert!(top.contains(&pick));
    }

    #[test]
    fn trait_score_in_unit_interval(
        left in prop::collection::vec(-1.0f64..1.0, 6),
        right in prop::collection::vec(-1.0f64..1.0, 6),
        warmup in any::<bool>()
    ) {
        let mut features = FeatureMap::new();
        features.insert_slice(ItemId(1), &left).unwrap();
        features.insert_slice(ItemId(2), &right).unwrap();
        let a = RatedItem::new(1).with_tags(["drama", "war"]);
        let b = RatedItem::new(2).with_tags(["drama"]);

        let mut profile = TasteProfile::new(1.0);
        profile.update(&features.delta(ItemId(1), ItemId(2)), true);

        let score = TasteCatSelector::default().trait_score(&a, &b, Some(&profile), &features, warmup);
        prop_assert!((0.0..=1.0).contains(&score));
    }
}
