//! Matching module - value-weighted similarity and its explanation.
//!
//! `MatchScorer` turns two effective value maps into a `MatchResult`:
//! a 0-100 score, the ranked key shared values behind it, and a
//! traceability graph. Fairness checks and audit records hang off the
//! finished result and never feed back into the score.

mod audit;
mod events;
mod fairness;
mod result;
mod scorer;
mod similarity;
mod traceability;

pub use audit::{AuditOutcome, AuditRecord, AuditStatus, AuditVerdict, Pseudonymizer};
pub use events::MatchComputed;
pub use fairness::{
    FairnessCheck, FairnessReview, SingleValueDominance, SparseProfile,
    DEFAULT_DOMINANCE_THRESHOLD, DEFAULT_MIN_PROFILE_CATEGORIES,
};
pub use result::{
    AdvisoryCode, AdvisoryFlag, CategoryContribution, KeySharedValue, MatchContext, MatchResult,
    MatchScore, ScoreBreakdown,
};
pub use scorer::{rank_key_values, weighted_average, MatchScorer};
pub use similarity::{MeasureKind, SetOverlap, SimilarityMeasure, StrengthRatio};
pub use traceability::{GraphEdge, GraphNode, NodeKind, TraceabilityGraph};
