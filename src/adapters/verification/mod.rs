//! Verification adapters.
//!
//! - `HttpVerificationSystem` - reqwest client for the external auditor
//! - `AcceptingVerificationSystem` - stand-in when verification is disabled
//! - `ChannelAuditSink` / `AuditWorker` - non-blocking audit queue
//! - `InMemoryAuditVerdictLog` - bounded outcome store

mod accepting;
mod channel_sink;
mod http_client;
mod verdict_log;

pub use accepting::AcceptingVerificationSystem;
pub use channel_sink::{audit_channel, AuditWorker, ChannelAuditSink};
pub use http_client::{HttpVerificationConfig, HttpVerificationSystem};
pub use verdict_log::InMemoryAuditVerdictLog;
