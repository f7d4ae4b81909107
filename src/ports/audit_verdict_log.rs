//! AuditVerdictLog port - where audit outcomes are kept for lookup.

use async_trait::async_trait;

use crate::domain::foundation::MatchId;
use crate::domain::matching::AuditOutcome;

#[async_trait]
pub trait AuditVerdictLog: Send + Sync {
    async fn record(&self, outcome: AuditOutcome);

    async fn find(&self, match_id: &MatchId) -> Option<AuditOutcome>;
}
