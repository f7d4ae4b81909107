//! GetAuditVerdictHandler - Look up the external audit outcome of a match.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, MatchId};
use crate::domain::matching::AuditOutcome;
use crate::ports::AuditVerdictLog;

#[derive(Debug, Clone)]
pub struct GetAuditVerdictQuery {
    pub match_id: MatchId,
}

pub struct GetAuditVerdictHandler {
    log: Arc<dyn AuditVerdictLog>,
}

impl GetAuditVerdictHandler {
    pub fn new(log: Arc<dyn AuditVerdictLog>) -> Self {
        Self { log }
    }

    /// `NotFound` covers both "not yet reviewed" and "evicted".
    pub async fn handle(&self, query: GetAuditVerdictQuery) -> Result<AuditOutcome, DomainError> {
        self.log.find(&query.match_id).await.ok_or_else(|| {
            DomainError::new(
                ErrorCode::NotFound,
                format!("No audit outcome recorded for match {}", query.match_id),
            )
            .with_detail("match_id", query.match_id.to_string())
        })
    }
}
