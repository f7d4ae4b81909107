//! AuditSink port - fire-and-forget hand-off of audit records.

use thiserror::Error;

use crate::domain::matching::AuditRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuditSubmitError {
    #[error("Audit queue is full; record dropped")]
    QueueFull,

    #[error("Audit queue is closed")]
    Closed,
}

/// Accepts audit records without blocking the caller.
///
/// `submit` must return immediately. Callers log errors and carry on.
pub trait AuditSink: Send + Sync {
    fn submit(&self, record: AuditRecord) -> Result<(), AuditSubmitError>;
}
