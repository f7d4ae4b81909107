//! Profile module - Value Profiles used as matching input.
//!
//! A `ValueProfile` is owned by exactly one user and is mutated whenever the
//! user edits stated values, completes an onboarding narrative step, or
//! (re)connects an external data source. The matcher only ever sees the
//! effective view produced by `ValueProfile::effective_values`.

mod category;
mod events;
mod value_profile;

pub use category::{ValueCategory, ValueStrength};
pub use events::{
    ExternalSourceConnected, ExternalSourceDisconnected, NarrativeStepCompleted,
    StatedValuesUpdated, ValueProfileCreated, ValueProfileDeleted,
};
pub use value_profile::{
    ExternalInsights, ExternalSourceId, NarrativeStepId, ProfileSources, ValueMap, ValueProfile,
    ValueSource,
};
