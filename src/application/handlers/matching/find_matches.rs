//! FindMatchesHandler - Rank candidate users for one user.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::matching::{MatchContext, MatchResult};
use crate::ports::ValueProfileRepository;

use super::{validate_context, ComputeMatchHandler};

/// Default number of ranked matches returned.
pub const DEFAULT_MATCH_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct FindMatchesQuery {
    pub user_id: UserId,
    /// Explicit candidates; when absent, stored users are scanned.
    pub candidates: Option<Vec<UserId>>,
    pub min_score: Option<f64>,
    pub limit: Option<usize>,
    pub context: MatchContext,
}

impl FindMatchesQuery {
    /// Query with default candidates, threshold and limit.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            candidates: None,
            min_score: None,
            limit: None,
            context: MatchContext::default(),
        }
    }
}

pub struct FindMatchesHandler {
    repository: Arc<dyn ValueProfileRepository>,
    matcher: Arc<ComputeMatchHandler>,
    max_candidates: usize,
}

impl FindMatchesHandler {
    pub fn new(
        repository: Arc<dyn ValueProfileRepository>,
        matcher: Arc<ComputeMatchHandler>,
        max_candidates: usize,
    ) -> Self {
        Self {
            repository,
            matcher,
            max_candidates,
        }
    }

    pub async fn handle(&self, query: FindMatchesQuery) -> Result<Vec<MatchResult>, DomainError> {
        let min_score = query.min_score.unwrap_or(0.0);
        if !min_score.is_finite() || !(0.0..=100.0).contains(&min_score) {
            return Err(DomainError::validation("min_score", "min_score must be within 0..=100"));
        }
        let limit = query.limit.unwrap_or(DEFAULT_MATCH_LIMIT);
        let context = validate_context(self.matcher.scorer().weights(), query.context)?;

        let subject = self
            .repository
            .find_by_user(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::profile_not_found(&query.user_id))?;

        let candidates = match query.candidates {
            Some(ids) => ids,
            // One extra so excluding the subject still leaves max_candidates.
            None => self.repository.list_user_ids(self.max_candidates + 1).await?,
        };

        let mut results = Vec::new();
        for candidate_id in candidates
            .iter()
            .filter(|id| **id != query.user_id)
            .take(self.max_candidates)
        {
            let Some(candidate) = self.repository.find_by_user(candidate_id).await? else {
                tracing::debug!(candidate = %candidate_id, "Skipping candidate without profile");
                continue;
            };

            let result = self.matcher.evaluate(&subject, &candidate, &context).await;
            if result.score.value() >= min_score {
                results.push(result);
            }
        }

        results.sort_by(|x, y| {
            y.score
                .partial_cmp(&x.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| x.user_b.cmp(&y.user_b))
        });
        results.truncate(limit);

        tracing::debug!(user_id = %query.user_id, matches = results.len(), "Candidates ranked");
        Ok(results)
    }
}
