//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `profile` - Value profile commands (stated values, narrative, external sources)
//! - `matching` - Match computation, candidate ranking and audit lookup

pub mod matching;
pub mod profile;

pub use matching::{
    validate_context, ComputeMatchHandler, ComputeMatchQuery, FindMatchesHandler,
    FindMatchesQuery, GetAuditVerdictHandler, GetAuditVerdictQuery, DEFAULT_MATCH_LIMIT,
};
pub use profile::{
    ConnectExternalSourceCommand, ConnectExternalSourceHandler, ConnectExternalSourceResult,
    DeleteProfileCommand, DeleteProfileHandler, DisconnectExternalSourceCommand,
    DisconnectExternalSourceHandler, GetProfileHandler, GetProfileQuery,
    RecordNarrativeStepCommand, RecordNarrativeStepHandler, RecordNarrativeStepResult,
    UpdateStatedValuesCommand, UpdateStatedValuesHandler, UpdateStatedValuesResult,
};
