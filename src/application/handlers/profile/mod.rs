//! Value profile command and query handlers.

mod common;
mod connect_external_source;
mod delete_profile;
mod disconnect_external_source;
mod get_profile;
mod record_narrative_step;
mod update_stated_values;

pub use common::unknown_categories;
pub use connect_external_source::{
    ConnectExternalSourceCommand, ConnectExternalSourceHandler, ConnectExternalSourceResult,
};
pub use delete_profile::{DeleteProfileCommand, DeleteProfileHandler};
pub use disconnect_external_source::{
    DisconnectExternalSourceCommand, DisconnectExternalSourceHandler,
};
pub use get_profile::{GetProfileHandler, GetProfileQuery};
pub use record_narrative_step::{
    RecordNarrativeStepCommand, RecordNarrativeStepHandler, RecordNarrativeStepResult,
};
pub use update_stated_values::{
    UpdateStatedValuesCommand, UpdateStatedValuesHandler, UpdateStatedValuesResult,
};

#[cfg(test)]
pub(crate) use common::test_support;
