//! VerificationSystem port - external auditor for match results.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::matching::{AuditRecord, AuditVerdict};

/// External reviewer of pseudonymised match records.
///
/// Reviews happen off the request path. A transport failure is reported
/// as `ErrorCode::VerificationUnavailable`.
#[async_trait]
pub trait VerificationSystem: Send + Sync {
    async fn review(&self, record: &AuditRecord) -> Result<AuditVerdict, DomainError>;
}
