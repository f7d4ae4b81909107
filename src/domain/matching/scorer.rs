//! Value-weighted similarity scorer.
//!
//! Scoring is a pure function of two effective value maps, the ethical
//! weight table and the match context. The scorer never fails: unknown
//! categories are skipped and an empty comparison scores zero.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::ethics::EthicalWeightTable;
use crate::domain::foundation::{MatchId, Timestamp, UserId};
use crate::domain::profile::{ValueCategory, ValueMap};

use super::result::{
    CategoryContribution, KeySharedValue, MatchContext, MatchResult, MatchScore, ScoreBreakdown,
};
use super::similarity::SimilarityMeasure;
use super::traceability::TraceabilityGraph;

/// Aggregates per-category contributions into a 0-100 score.
///
/// `100 × Σ(similarity × weight) / Σ weight`. Returns zero when the total
/// weight is zero.
pub fn weighted_average(contributions: &[CategoryContribution]) -> MatchScore {
    let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
    if total_weight <= 0.0 {
        return MatchScore::ZERO;
    }
    let total_contribution: f64 = contributions.iter().map(|c| c.contribution).sum();
    MatchScore::new(100.0 * (total_contribution / total_weight))
}

/// Ranks contributions into the explanation set.
///
/// Highest contribution first, ties broken by category key. Entries with
/// no contribution or below `threshold` are dropped.
pub fn rank_key_values(contributions: &[CategoryContribution], threshold: f64) -> Vec<KeySharedValue> {
    let mut ranked: Vec<KeySharedValue> = contributions
        .iter()
        .filter(|c| c.contribution > 0.0 && c.contribution >= threshold)
        .cloned()
        .collect();

    ranked.sort_by(|x, y| {
        y.contribution
            .partial_cmp(&x.contribution)
            .unwrap_or(Ordering::Equal)
            .then_with(|| x.category.key().cmp(y.category.key()))
    });
    ranked
}

/// Computes value-weighted compatibility between two profiles.
#[derive(Clone)]
pub struct MatchScorer {
    weights: Arc<EthicalWeightTable>,
    measure: Arc<dyn SimilarityMeasure>,
    default_min_contribution: f64,
}

impl MatchScorer {
    pub fn new(
        weights: Arc<EthicalWeightTable>,
        measure: Arc<dyn SimilarityMeasure>,
        default_min_contribution: f64,
    ) -> Self {
        Self {
            weights,
            measure,
            default_min_contribution,
        }
    }

    pub fn weights(&self) -> &EthicalWeightTable {
        &self.weights
    }

    pub fn measure_name(&self) -> &'static str {
        self.measure.name()
    }

    /// Scores two effective value maps without building a full result.
    pub fn compute(&self, a: &ValueMap, b: &ValueMap, ctx: &MatchContext) -> ScoreBreakdown {
        let union: BTreeSet<&ValueCategory> = a.keys().chain(b.keys()).collect();
        let mut breakdown = Vec::with_capacity(union.len());

        for category in union {
            let (canonical, weight) = match (
                self.weights.canonical(category),
                self.weights.weight_of(category),
            ) {
                (Some(canonical), Some(weight)) => (canonical, weight),
                _ => {
                    tracing::debug!(category = %category, "Skipping category outside weight table");
                    continue;
                }
            };

            if !ctx.allows(canonical) {
                continue;
            }

            let similarity = self
                .measure
                .similarity(a.get(category).copied(), b.get(category).copied())
                .clamp(0.0, 1.0);
            let weight = weight.value();

            breakdown.push(CategoryContribution {
                category: canonical.clone(),
                similarity,
                weight,
                contribution: similarity * weight,
            });
        }

        let score = weighted_average(&breakdown);
        let threshold = ctx
            .min_contribution
            .unwrap_or(self.default_min_contribution);
        let key_shared_values = rank_key_values(&breakdown, threshold);

        ScoreBreakdown {
            score,
            breakdown,
            key_shared_values,
        }
    }

    /// Scores two users and assembles the explainable result.
    pub fn score(
        &self,
        user_a: &UserId,
        a: &ValueMap,
        user_b: &UserId,
        b: &ValueMap,
        ctx: &MatchContext,
    ) -> MatchResult {
        let computed = self.compute(a, b, ctx);
        let graph = TraceabilityGraph::build(user_a, user_b, &computed.key_shared_values);

        MatchResult {
            match_id: MatchId::new(),
            user_a: user_a.clone(),
            user_b: user_b.clone(),
            score: computed.score,
            measure: self.measure.name().to_string(),
            key_shared_values: computed.key_shared_values,
            breakdown: computed.breakdown,
            graph,
            advisories: Vec::new(),
            computed_at: Timestamp::now(),
        }
    }
}

impl std::fmt::Debug for MatchScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchScorer")
            .field("measure", &self.measure.name())
            .field("categories", &self.weights.len())
            .field("default_min_contribution", &self.default_min_contribution)
            .finish()
    }
}
