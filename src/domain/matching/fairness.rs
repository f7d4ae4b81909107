//! In-process fairness checks.
//!
//! Checks run after scoring and may only append advisory flags. A check
//! that wants to change a score is a bug.

use crate::domain::profile::ValueMap;

use super::result::{AdvisoryCode, AdvisoryFlag, MatchResult};

/// Default share of total contribution that counts as dominance.
pub const DEFAULT_DOMINANCE_THRESHOLD: f64 = 0.8;

/// Default minimum number of effective categories per profile.
pub const DEFAULT_MIN_PROFILE_CATEGORIES: usize = 2;

/// A single advisory check over a computed match.
pub trait FairnessCheck: Send + Sync {
    fn name(&self) -> &'static str;

    /// Inspects a result together with both users' effective values.
    fn inspect(&self, a: &ValueMap, b: &ValueMap, result: &MatchResult) -> Option<AdvisoryFlag>;
}

/// Flags results where one category carries almost all of the score.
#[derive(Debug, Clone, Copy)]
pub struct SingleValueDominance {
    pub threshold: f64,
}

impl Default for SingleValueDominance {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DOMINANCE_THRESHOLD,
        }
    }
}

impl FairnessCheck for SingleValueDominance {
    fn name(&self) -> &'static str {
        "single_value_dominance"
    }

    fn inspect(&self, _a: &ValueMap, _b: &ValueMap, result: &MatchResult) -> Option<AdvisoryFlag> {
        if result.breakdown.len() < 2 {
            return None;
        }

        let total: f64 = result.breakdown.iter().map(|c| c.contribution).sum();
        if total <= 0.0 {
            return None;
        }

        let top = result
            .breakdown
            .iter()
            .max_by(|x, y| x.contribution.total_cmp(&y.contribution))?;
        let share = top.contribution / total;

        (share >= self.threshold).then(|| {
            AdvisoryFlag::new(
                AdvisoryCode::SingleValueDominance,
                self.name(),
                format!(
                    "'{}' accounts for {:.0}% of the match",
                    top.category.label(),
                    share * 100.0
                ),
            )
        })
    }
}

/// Flags results where either profile is too thin to compare meaningfully.
#[derive(Debug, Clone, Copy)]
pub struct SparseProfile {
    pub min_categories: usize,
}

impl Default for SparseProfile {
    fn default() -> Self {
        Self {
            min_categories: DEFAULT_MIN_PROFILE_CATEGORIES,
        }
    }
}

impl FairnessCheck for SparseProfile {
    fn name(&self) -> &'static str {
        "sparse_profile"
    }

    fn inspect(&self, a: &ValueMap, b: &ValueMap, result: &MatchResult) -> Option<AdvisoryFlag> {
        let sparse: Vec<String> = [(&result.user_a, a), (&result.user_b, b)]
            .into_iter()
            .filter(|(_, values)| values.len() < self.min_categories)
            .map(|(user, _)| user.to_string())
            .collect();

        if sparse.is_empty() {
            return None;
        }

        Some(AdvisoryFlag::new(
            AdvisoryCode::SparseProfile,
            self.name(),
            format!(
                "Fewer than {} values on profile of {}",
                self.min_categories,
                sparse.join(", ")
            ),
        ))
    }
}

/// Ordered set of fairness checks applied to every match.
pub struct FairnessReview {
    checks: Vec<Box<dyn FairnessCheck>>,
}

impl FairnessReview {
    pub fn new(checks: Vec<Box<dyn FairnessCheck>>) -> Self {
        Self { checks }
    }

    /// The built-in checks with the given thresholds.
    pub fn standard(dominance_threshold: f64, min_profile_categories: usize) -> Self {
        Self::new(vec![
            Box::new(SingleValueDominance {
                threshold: dominance_threshold,
            }),
            Box::new(SparseProfile {
                min_categories: min_profile_categories,
            }),
        ])
    }

    /// Runs every check and appends any flags to the result.
    pub fn apply(&self, a: &ValueMap, b: &ValueMap, result: &mut MatchResult) {
        for check in &self.checks {
            if let Some(flag) = check.inspect(a, b, result) {
                tracing::debug!(
                    match_id = %result.match_id,
                    check = check.name(),
                    "Fairness advisory raised"
                );
                result.flag(flag);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for FairnessReview {
    fn default() -> Self {
        Self::standard(DEFAULT_DOMINANCE_THRESHOLD, DEFAULT_MIN_PROFILE_CATEGORIES)
    }
}
