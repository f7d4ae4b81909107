//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-process event bus
//! - `http` - axum REST API
//! - `profile` - Value profile stores (in-memory, PostgreSQL)
//! - `verification` - Audit queue, worker and Verification System clients

pub mod events;
pub mod http;
pub mod profile;
pub mod verification;

pub use events::InMemoryEventBus;
pub use profile::{InMemoryValueProfileRepository, PgValueProfileRepository};
pub use verification::{
    audit_channel, AcceptingVerificationSystem, AuditWorker, ChannelAuditSink,
    HttpVerificationConfig, HttpVerificationSystem, InMemoryAuditVerdictLog,
};
