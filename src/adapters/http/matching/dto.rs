//! HTTP DTOs for matching and audit endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::matching::{
    AdvisoryFlag, AuditOutcome, AuditStatus, CategoryContribution, MatchContext, MatchResult,
    TraceabilityGraph,
};
use crate::domain::profile::ValueCategory;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Query string of GET /api/matches/:user_a/:user_b
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchQueryParams {
    pub min_contribution: Option<f64>,
    /// Comma-separated category allow-list.
    pub categories: Option<String>,
}

impl MatchQueryParams {
    pub fn into_context(self) -> Result<MatchContext, DomainError> {
        let categories = self
            .categories
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            });
        build_context(self.min_contribution, categories)
    }
}

/// Body of POST /api/matches/:user_id/candidates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindMatchesRequest {
    /// Explicit candidate ids; stored users are scanned when absent.
    pub candidates: Option<Vec<String>>,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
    pub min_contribution: Option<f64>,
    pub categories: Option<Vec<String>>,
}

impl FindMatchesRequest {
    pub fn candidate_ids(&self) -> Result<Option<Vec<UserId>>, DomainError> {
        self.candidates
            .as_ref()
            .map(|ids| {
                ids.iter()
                    .map(|id| UserId::new(id.as_str()).map_err(DomainError::from))
                    .collect()
            })
            .transpose()
    }

    pub fn context(&self) -> Result<MatchContext, DomainError> {
        build_context(self.min_contribution, self.categories.clone())
    }
}

/// An empty category list means no allow-list, not an allow-list of nothing.
fn build_context(
    min_contribution: Option<f64>,
    categories: Option<Vec<String>>,
) -> Result<MatchContext, DomainError> {
    let mut context = MatchContext::default();
    if let Some(threshold) = min_contribution {
        context = context.with_min_contribution(threshold);
    }
    if let Some(labels) = categories.filter(|labels| !labels.is_empty()) {
        let allowed = labels
            .into_iter()
            .map(ValueCategory::new)
            .collect::<Result<Vec<_>, _>>()?;
        context = context.with_allow_list(allowed);
    }
    Ok(context)
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionResponse {
    pub category: String,
    pub similarity: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl From<&CategoryContribution> for ContributionResponse {
    fn from(c: &CategoryContribution) -> Self {
        Self {
            category: c.category.label().to_string(),
            similarity: c.similarity,
            weight: c.weight,
            contribution: c.contribution,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub match_id: String,
    pub user_a: String,
    pub user_b: String,
    /// Percentage in `[0, 100]`.
    pub score: f64,
    pub measure: String,
    pub key_shared_values: Vec<ContributionResponse>,
    pub breakdown: Vec<ContributionResponse>,
    pub graph: TraceabilityGraph,
    pub advisories: Vec<AdvisoryFlag>,
    pub computed_at: Timestamp,
}

impl From<MatchResult> for MatchResponse {
    fn from(result: MatchResult) -> Self {
        Self {
            match_id: result.match_id.to_string(),
            user_a: result.user_a.to_string(),
            user_b: result.user_b.to_string(),
            score: result.score.value(),
            measure: result.measure,
            key_shared_values: result.key_shared_values.iter().map(Into::into).collect(),
            breakdown: result.breakdown.iter().map(Into::into).collect(),
            graph: result.graph,
            advisories: result.advisories,
            computed_at: result.computed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchListResponse {
    pub user_id: String,
    pub matches: Vec<MatchResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutcomeResponse {
    pub match_id: String,
    pub status: AuditStatus,
    pub reason: String,
    pub recorded_at: Timestamp,
}

impl From<AuditOutcome> for AuditOutcomeResponse {
    fn from(outcome: AuditOutcome) -> Self {
        Self {
            match_id: outcome.match_id.to_string(),
            status: outcome.status,
            reason: outcome.reason,
            recorded_at: outcome.recorded_at,
        }
    }
}
