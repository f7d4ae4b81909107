//! Match results and the context that shapes them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{MatchId, Timestamp, UserId};
use crate::domain::profile::ValueCategory;

use super::traceability::TraceabilityGraph;

/// Normalized compatibility score in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScore(f64);

impl MatchScore {
    pub const ZERO: Self = Self(0.0);
    pub const MAX: Self = Self(100.0);

    /// Creates a score, clamping into range. NaN becomes zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(Self::ZERO.0, Self::MAX.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for MatchScore {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// One category's part in a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryContribution {
    /// Category label as defined by the weight table.
    pub category: ValueCategory,
    /// Per-category similarity in `[0, 1]`.
    pub similarity: f64,
    /// Ethical weight applied.
    pub weight: f64,
    /// `similarity × weight`.
    pub contribution: f64,
}

/// A shared value that made it into the explanation set.
pub type KeySharedValue = CategoryContribution;

/// Caller-supplied filters for a single match computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchContext {
    /// Minimum contribution for a category to count as a key shared value.
    /// Falls back to the configured default.
    #[serde(default)]
    pub min_contribution: Option<f64>,
    /// If set, only these categories take part in scoring.
    #[serde(default)]
    pub category_allow_list: Option<BTreeSet<ValueCategory>>,
}

impl MatchContext {
    pub fn with_min_contribution(mut self, threshold: f64) -> Self {
        self.min_contribution = Some(threshold);
        self
    }

    pub fn with_allow_list(mut self, categories: impl IntoIterator<Item = ValueCategory>) -> Self {
        self.category_allow_list = Some(categories.into_iter().collect());
        self
    }

    /// Returns true if the category passes the allow-list.
    pub fn allows(&self, category: &ValueCategory) -> bool {
        self.category_allow_list
            .as_ref()
            .map_or(true, |allowed| allowed.contains(category))
    }
}

/// Kind of advisory raised against a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCode {
    SingleValueDominance,
    SparseProfile,
}

impl fmt::Display for AdvisoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdvisoryCode::SingleValueDominance => "single_value_dominance",
            AdvisoryCode::SparseProfile => "sparse_profile",
        };
        write!(f, "{}", s)
    }
}

/// Non-blocking annotation on a match. Never changes the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryFlag {
    pub code: AdvisoryCode,
    pub message: String,
    /// Name of the check that raised it.
    pub source: String,
}

impl AdvisoryFlag {
    pub fn new(code: AdvisoryCode, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: source.into(),
        }
    }
}

/// Score plus the full and filtered per-category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub score: MatchScore,
    /// Every category that took part, in category order.
    pub breakdown: Vec<CategoryContribution>,
    /// Ranked explanation set.
    pub key_shared_values: Vec<KeySharedValue>,
}

impl ScoreBreakdown {
    /// Sum of all contributions.
    pub fn total_contribution(&self) -> f64 {
        self.breakdown.iter().map(|c| c.contribution).sum()
    }
}

/// Ephemeral result of matching two users. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub user_a: UserId,
    pub user_b: UserId,
    pub score: MatchScore,
    pub measure: String,
    pub key_shared_values: Vec<KeySharedValue>,
    pub breakdown: Vec<CategoryContribution>,
    pub graph: TraceabilityGraph,
    pub advisories: Vec<AdvisoryFlag>,
    pub computed_at: Timestamp,
}

impl MatchResult {
    /// Names of the key shared values, in rank order.
    pub fn key_value_labels(&self) -> Vec<String> {
        self.key_shared_values
            .iter()
            .map(|v| v.category.label().to_string())
            .collect()
    }

    /// Attaches an advisory. The score is deliberately untouched.
    pub fn flag(&mut self, advisory: AdvisoryFlag) {
        self.advisories.push(advisory);
    }

    pub fn has_advisory(&self, code: AdvisoryCode) -> bool {
        self.advisories.iter().any(|a| a.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_score_clamps_into_range() {
        assert_eq!(MatchScore::new(-5.0).value(), 0.0);
        assert_eq!(MatchScore::new(120.0), MatchScore::MAX);
        assert_eq!(MatchScore::new(f64::NAN).value(), 0.0);
        assert_eq!(MatchScore::new(42.5).value(), 42.5);
    }

    #[test]
    fn match_score_displays_two_decimals() {
        assert_eq!(MatchScore::new(42.857142).to_string(), "42.86%");
    }

    #[test]
    fn context_allows_everything_without_list() {
        let ctx = MatchContext::default();
        assert!(ctx.allows(&ValueCategory::new("Anything").unwrap()));
    }

    #[test]
    fn context_allow_list_is_case_insensitive() {
        let ctx = MatchContext::default().with_allow_list([ValueCategory::new("Community").unwrap()]);
        assert!(ctx.allows(&ValueCategory::new("community").unwrap()));
        assert!(!ctx.allows(&ValueCategory::new("Innovation").unwrap()));
    }

    #[test]
    fn advisory_code_serializes_snake_case() {
        let flag = AdvisoryFlag::new(AdvisoryCode::SparseProfile, "sparse_profile", "thin");
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["code"], "sparse_profile");
    }
}
