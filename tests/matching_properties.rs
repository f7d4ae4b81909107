//! Property tests for the match scorer.

use std::sync::Arc;

use proptest::prelude::*;

use thinkalike::domain::ethics::{EthicalWeight, EthicalWeightTable};
use thinkalike::domain::matching::{MatchContext, MatchScorer, SetOverlap, StrengthRatio};
use thinkalike::domain::profile::{ValueCategory, ValueMap, ValueStrength};

const CATALOG: [(&str, f64); 6] = [
    ("Transparency", 0.9),
    ("Community", 0.7),
    ("Innovation", 0.5),
    ("Sustainability", 0.8),
    ("Curiosity", 0.3),
    ("Privacy", 1.0),
];

fn table() -> EthicalWeightTable {
    EthicalWeightTable::from_entries(CATALOG).unwrap()
}

fn scorers(table: EthicalWeightTable) -> [MatchScorer; 2] {
    let table = Arc::new(table);
    [
        MatchScorer::new(table.clone(), Arc::new(SetOverlap), 0.0),
        MatchScorer::new(table, Arc::new(StrengthRatio), 0.0),
    ]
}

fn category(index: usize) -> ValueCategory {
    ValueCategory::new(CATALOG[index].0).unwrap()
}

/// A profile over the catalog: each slot is either absent or a strength.
fn profile() -> impl Strategy<Value = ValueMap> {
    prop::collection::vec(prop::option::of(0.01f64..=1.0), CATALOG.len()).prop_map(|slots| {
        slots
            .into_iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|s| (category(i), ValueStrength::new(s).unwrap())))
            .collect()
    })
}

fn non_empty_profile() -> impl Strategy<Value = ValueMap> {
    profile().prop_filter("at least one value", |p| !p.is_empty())
}

proptest! {
    #[test]
    fn score_is_symmetric(a in profile(), b in profile()) {
        for scorer in scorers(table()) {
            let ab = scorer.compute(&a, &b, &MatchContext::default());
            let ba = scorer.compute(&b, &a, &MatchContext::default());
            prop_assert_eq!(ab.score, ba.score);
        }
    }

    #[test]
    fn score_stays_within_bounds(a in profile(), b in profile()) {
        for scorer in scorers(table()) {
            let score = scorer.compute(&a, &b, &MatchContext::default()).score.value();
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn self_match_is_perfect(a in non_empty_profile()) {
        for scorer in scorers(table()) {
            let result = scorer.compute(&a, &a, &MatchContext::default());
            prop_assert_eq!(result.score.value(), 100.0);
            prop_assert_eq!(result.key_shared_values.len(), a.len());
        }
    }

    #[test]
    fn disjoint_profiles_score_zero(split in 1usize..CATALOG.len(), a in profile(), b in profile()) {
        let a: ValueMap = a.into_iter().filter(|(c, _)| position(c) < split).collect();
        let b: ValueMap = b.into_iter().filter(|(c, _)| position(c) >= split).collect();

        for scorer in scorers(table()) {
            let result = scorer.compute(&a, &b, &MatchContext::default());
            prop_assert_eq!(result.score.value(), 0.0);
            prop_assert!(result.key_shared_values.is_empty());
        }
    }

    #[test]
    fn scoring_is_deterministic(a in profile(), b in profile()) {
        let [jaccard, _] = scorers(table());
        let first = jaccard.compute(&a, &b, &MatchContext::default());
        let second = jaccard.compute(&a, &b, &MatchContext::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn raising_shared_weight_never_lowers_jaccard_score(
        a in non_empty_profile(),
        b in profile(),
        raised in 0.01f64..=1.0,
    ) {
        let Some(shared) = a.keys().find(|c| b.contains_key(*c)).cloned() else {
            return Ok(());
        };
        let base = table();
        let current = base.weight_of(&shared).unwrap().value();
        let new_weight = current.max(raised);
        let heavier = base.with_weight(&shared, EthicalWeight::new(new_weight).unwrap());

        let before = MatchScorer::new(Arc::new(base), Arc::new(SetOverlap), 0.0)
            .compute(&a, &b, &MatchContext::default());
        let after = MatchScorer::new(Arc::new(heavier), Arc::new(SetOverlap), 0.0)
            .compute(&a, &b, &MatchContext::default());

        prop_assert!(after.score.value() + 1e-9 >= before.score.value());
    }

    #[test]
    fn raising_unshared_weight_never_raises_jaccard_score(
        a in non_empty_profile(),
        b in profile(),
        raised in 0.01f64..=1.0,
    ) {
        let Some(unshared) = a.keys().find(|c| !b.contains_key(*c)).cloned() else {
            return Ok(());
        };
        let base = table();
        let current = base.weight_of(&unshared).unwrap().value();
        let heavier = base.with_weight(&unshared, EthicalWeight::new(current.max(raised)).unwrap());

        let before = MatchScorer::new(Arc::new(base), Arc::new(SetOverlap), 0.0)
            .compute(&a, &b, &MatchContext::default());
        let after = MatchScorer::new(Arc::new(heavier), Arc::new(SetOverlap), 0.0)
            .compute(&a, &b, &MatchContext::default());

        prop_assert!(after.score.value() <= before.score.value() + 1e-9);
    }

    #[test]
    fn filters_never_change_the_score(a in profile(), b in profile(), threshold in 0.0f64..=1.0) {
        let [jaccard, _] = scorers(table());
        let plain = jaccard.compute(&a, &b, &MatchContext::default());
        let filtered = jaccard.compute(
            &a,
            &b,
            &MatchContext::default()
                .with_min_contribution(threshold)
                .with_allow_list([category(0), category(1)]),
        );

        prop_assert_eq!(plain.score, filtered.score);
        prop_assert!(filtered.key_shared_values.len() <= plain.key_shared_values.len());
        prop_assert!(filtered.key_shared_values.iter().all(|v| v.contribution >= threshold));
    }
}

fn position(category: &ValueCategory) -> usize {
    CATALOG
        .iter()
        .position(|(name, _)| ValueCategory::new(*name).unwrap() == *category)
        .unwrap()
}

#[test]
fn reference_example_matches_documented_score() {
    let a: ValueMap = [(category(0), ValueStrength::FULL), (category(1), ValueStrength::FULL)]
        .into_iter()
        .collect();
    let b: ValueMap = [(category(0), ValueStrength::FULL), (category(2), ValueStrength::FULL)]
        .into_iter()
        .collect();
    let three = EthicalWeightTable::from_entries(CATALOG[..3].iter().copied()).unwrap();

    let result = MatchScorer::new(Arc::new(three), Arc::new(SetOverlap), 0.0)
        .compute(&a, &b, &MatchContext::default());

    assert!((result.score.value() - 42.857142857142854).abs() < 1e-9);
    assert_eq!(result.key_shared_values.len(), 1);
    assert_eq!(result.key_shared_values[0].category.label(), "Transparency");
}
