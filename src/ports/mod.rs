//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ValueProfileRepository` - Profile persistence
//! - `EventPublisher` - Domain event publication
//! - `VerificationSystem` - External audit of match results
//! - `AuditSink` - Non-blocking hand-off of audit records
//! - `AuditVerdictLog` - Lookup of audit outcomes by match

mod audit_sink;
mod audit_verdict_log;
mod event_publisher;
mod value_profile_repository;
mod verification_system;

pub use audit_sink::{AuditSink, AuditSubmitError};
pub use audit_verdict_log::AuditVerdictLog;
pub use event_publisher::EventPublisher;
pub use value_profile_repository::ValueProfileRepository;
pub use verification_system::VerificationSystem;
