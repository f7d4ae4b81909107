//! Channel-backed audit sink and the worker that drains it.
//!
//! `ChannelAuditSink::submit` never waits: a full queue drops the record.
//! `AuditWorker` runs in the background, forwards each record to the
//! Verification System and stores the outcome.

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::domain::matching::{AuditOutcome, AuditRecord};
use crate::ports::{AuditSink, AuditSubmitError, AuditVerdictLog, VerificationSystem};

/// Creates a bounded audit queue.
pub fn audit_channel(capacity: usize) -> (ChannelAuditSink, mpsc::Receiver<AuditRecord>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelAuditSink { tx }, rx)
}

#[derive(Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::Sender<AuditRecord>,
}

impl AuditSink for ChannelAuditSink {
    fn submit(&self, record: AuditRecord) -> Result<(), AuditSubmitError> {
        self.tx.try_send(record).map_err(|e| match e {
            TrySendError::Full(record) => {
                tracing::warn!(match_id = %record.match_id, "Audit queue full; dropping record");
                AuditSubmitError::QueueFull
            }
            TrySendError::Closed(_) => AuditSubmitError::Closed,
        })
    }
}

pub struct AuditWorker {
    rx: mpsc::Receiver<AuditRecord>,
    verifier: Arc<dyn VerificationSystem>,
    log: Arc<dyn AuditVerdictLog>,
}

impl AuditWorker {
    pub fn new(
        rx: mpsc::Receiver<AuditRecord>,
        verifier: Arc<dyn VerificationSystem>,
        log: Arc<dyn AuditVerdictLog>,
    ) -> Self {
        Self { rx, verifier, log }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Processes records until every sink is dropped.
    pub async fn run(mut self) {
        tracing::info!("Audit worker started");

        while let Some(record) = self.rx.recv().await {
            let outcome = match self.verifier.review(&record).await {
                Ok(verdict) => {
                    if verdict.passed {
                        tracing::debug!(match_id = %record.match_id, "Audit passed");
                    } else {
                        tracing::warn!(
                            match_id = %record.match_id,
                            reason = %verdict.reason,
                            "Audit failed"
                        );
                    }
                    AuditOutcome::from_verdict(record.match_id, verdict)
                }
                Err(e) => {
                    tracing::warn!(match_id = %record.match_id, error = %e, "Verification unavailable");
                    AuditOutcome::unavailable(record.match_id, e.message())
                }
            };
            self.log.record(outcome).await;
        }

        tracing::info!("Audit worker stopped");
    }
}
