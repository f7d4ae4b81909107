//! Per-category similarity measures.
//!
//! A measure answers one question: given how strongly each user holds a
//! single category (or that they don't hold it at all), how similar are
//! they on that category, in `[0, 1]`? Aggregation across categories is
//! handled separately by `weighted_average`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::domain::profile::ValueStrength;

/// Swappable per-category similarity measure.
///
/// Implementations must be pure and symmetric in their arguments unless
/// they document otherwise.
pub trait SimilarityMeasure: Send + Sync {
    /// Stable name reported on every match result.
    fn name(&self) -> &'static str;

    /// Similarity on one category. `None` means the user does not hold it.
    fn similarity(&self, a: Option<ValueStrength>, b: Option<ValueStrength>) -> f64;
}

/// Set-overlap measure: 1 when both users hold the category, else 0.
///
/// Aggregated with `weighted_average` this yields the weighted Jaccard
/// index of the two category sets. Strength only decides membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOverlap;

impl SimilarityMeasure for SetOverlap {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn similarity(&self, a: Option<ValueStrength>, b: Option<ValueStrength>) -> f64 {
        match (a, b) {
            (Some(_), Some(_)) => 1.0,
            _ => 0.0,
        }
    }
}

/// Strength ratio: `min(a, b) / max(a, b)` when both hold the category.
///
/// Rewards agreement on *how much* a value matters. Unlike `SetOverlap`,
/// raising the weight of a shared category whose ratio is below the
/// current score pulls the score down.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthRatio;

impl SimilarityMeasure for StrengthRatio {
    fn name(&self) -> &'static str {
        "strength_ratio"
    }

    fn similarity(&self, a: Option<ValueStrength>, b: Option<ValueStrength>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) => {
                let (a, b) = (a.value(), b.value());
                a.min(b) / a.max(b)
            }
            _ => 0.0,
        }
    }
}

/// Configurable choice of similarity measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    #[default]
    Jaccard,
    StrengthRatio,
}

impl MeasureKind {
    /// Instantiates the measure.
    pub fn build(self) -> Arc<dyn SimilarityMeasure> {
        match self {
            MeasureKind::Jaccard => Arc::new(SetOverlap),
            MeasureKind::StrengthRatio => Arc::new(StrengthRatio),
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasureKind::Jaccard => write!(f, "jaccard"),
            MeasureKind::StrengthRatio => write!(f, "strength_ratio"),
        }
    }
}
