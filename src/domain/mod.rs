//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, events)
//! - `profile` - Value Profile aggregate and its events
//! - `ethics` - Ethical Weight Table
//! - `matching` - Value-weighted scoring, traceability, fairness and audit records

pub mod ethics;
pub mod foundation;
pub mod matching;
pub mod profile;
