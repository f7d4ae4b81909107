//! Value profile domain events.
//!
//! Events published when a profile changes:
//! - `ValueProfileCreated` - First mutation created the profile
//! - `StatedValuesUpdated` - User edited stated values in settings
//! - `NarrativeStepCompleted` - Onboarding step contributed traits
//! - `ExternalSourceConnected` - External source (re)connected with consent
//! - `ExternalSourceDisconnected` - External source removed
//! - `ValueProfileDeleted` - Profile deleted on user request

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, Timestamp, UserId, ValueProfileId};

use super::{ExternalSourceId, NarrativeStepId, ValueCategory};

/// Published when a user's first profile mutation creates the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueProfileCreated {
    pub event_id: EventId,
    pub profile_id: ValueProfileId,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

domain_event!(
    ValueProfileCreated,
    event_type = "value_profile.created.v1",
    aggregate_id = profile_id,
    aggregate_type = "ValueProfile",
    occurred_at = created_at,
    event_id = event_id
);

/// Published when stated values are replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatedValuesUpdated {
    pub event_id: EventId,
    pub profile_id: ValueProfileId,
    pub user_id: UserId,
    pub version: u32,
    /// Categories now stated.
    pub categories: Vec<ValueCategory>,
    pub updated_at: Timestamp,
}

domain_event!(
    StatedValuesUpdated,
    event_type = "value_profile.stated_values_updated.v1",
    aggregate_id = profile_id,
    aggregate_type = "ValueProfile",
    occurred_at = updated_at,
    event_id = event_id
);

/// Published when an onboarding step contributes narrative traits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeStepCompleted {
    pub event_id: EventId,
    pub profile_id: ValueProfileId,
    pub user_id: UserId,
    pub version: u32,
    pub step_id: NarrativeStepId,
    /// True if the step had been completed before and was redone.
    pub redone: bool,
    pub traits: Vec<ValueCategory>,
    pub completed_at: Timestamp,
}

domain_event!(
    NarrativeStepCompleted,
    event_type = "value_profile.narrative_step_completed.v1",
    aggregate_id = profile_id,
    aggregate_type = "ValueProfile",
    occurred_at = completed_at,
    event_id = event_id
);

/// Published when an external source is connected or refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSourceConnected {
    pub event_id: EventId,
    pub profile_id: ValueProfileId,
    pub user_id: UserId,
    pub version: u32,
    pub source: ExternalSourceId,
    pub refreshed: bool,
    pub insight_count: usize,
    pub connected_at: Timestamp,
}

domain_event!(
    ExternalSourceConnected,
    event_type = "value_profile.external_source_connected.v1",
    aggregate_id = profile_id,
    aggregate_type = "ValueProfile",
    occurred_at = connected_at,
    event_id = event_id
);

/// Published when an external source is disconnected and its insights dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSourceDisconnected {
    pub event_id: EventId,
    pub profile_id: ValueProfileId,
    pub user_id: UserId,
    pub version: u32,
    pub source: ExternalSourceId,
    pub disconnected_at: Timestamp,
}

domain_event!(
    ExternalSourceDisconnected,
    event_type = "value_profile.external_source_disconnected.v1",
    aggregate_id = profile_id,
    aggregate_type = "ValueProfile",
    occurred_at = disconnected_at,
    event_id = event_id
);

/// Published when a profile is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueProfileDeleted {
    pub event_id: EventId,
    pub profile_id: ValueProfileId,
    pub user_id: UserId,
    pub deleted_at: Timestamp,
}

domain_event!(
    ValueProfileDeleted,
    event_type = "value_profile.deleted.v1",
    aggregate_id = profile_id,
    aggregate_type = "ValueProfile",
    occurred_at = deleted_at,
    event_id = event_id
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SerializableDomainEvent;

    #[test]
    fn created_event_envelope_uses_profile_as_aggregate() {
        let profile_id = ValueProfileId::new();
        let event = ValueProfileCreated {
            event_id: EventId::new(),
            profile_id,
            user_id: UserId::new("alice").unwrap(),
            created_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        assert_eq!(envelope.event_type, "value_profile.created.v1");
        assert_eq!(envelope.aggregate_type, "ValueProfile");
        assert_eq!(envelope.aggregate_id, profile_id.to_string());
        assert_eq!(envelope.payload["user_id"], "alice");
    }

    #[test]
    fn narrative_event_serializes_step_and_traits() {
        let event = NarrativeStepCompleted {
            event_id: EventId::new(),
            profile_id: ValueProfileId::new(),
            user_id: UserId::new("alice").unwrap(),
            version: 4,
            step_id: NarrativeStepId::new("crossroads").unwrap(),
            redone: false,
            traits: vec![ValueCategory::new("Courage").unwrap()],
            completed_at: Timestamp::now(),
        };

        let envelope = event.to_envelope();
        assert_eq!(envelope.payload["step_id"], "crossroads");
        assert_eq!(envelope.payload["traits"][0], "Courage");
        assert_eq!(envelope.payload["version"], 4);
    }
}
