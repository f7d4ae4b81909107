//! Helpers shared by the profile command handlers.

use std::sync::Arc;

use crate::domain::ethics::EthicalWeightTable;
use crate::domain::foundation::{
    DomainError, ErrorCode, EventEnvelope, EventId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::domain::profile::{ValueMap, ValueProfile, ValueProfileCreated};
use crate::ports::{EventPublisher, ValueProfileRepository};

/// Rewrites every category to its weight-table label, rejecting unknown ones.
pub fn canonicalize(table: &EthicalWeightTable, values: ValueMap) -> Result<ValueMap, DomainError> {
    let unknown: Vec<String> = table
        .unknown(values.keys())
        .into_iter()
        .map(|c| c.label().to_string())
        .collect();

    if !unknown.is_empty() {
        return Err(unknown_categories(&unknown));
    }

    Ok(values
        .into_iter()
        .filter_map(|(category, strength)| {
            table.canonical(&category).map(|c| (c.clone(), strength))
        })
        .collect())
}

pub fn unknown_categories(labels: &[String]) -> DomainError {
    DomainError::new(
        ErrorCode::UnknownCategory,
        format!("Unknown value categories: {}", labels.join(", ")),
    )
    .with_detail("categories", labels.join(","))
}

/// Loads the user's profile, creating an empty one on first use.
///
/// Returns the creation event when the profile is new.
pub async fn load_or_create(
    repository: &Arc<dyn ValueProfileRepository>,
    user_id: &UserId,
    now: Timestamp,
) -> Result<(ValueProfile, Option<EventEnvelope>), DomainError> {
    if let Some(profile) = repository.find_by_user(user_id).await? {
        return Ok((profile, None));
    }

    let profile = ValueProfile::new(user_id.clone(), now);
    let created = ValueProfileCreated {
        event_id: EventId::new(),
        profile_id: profile.id(),
        user_id: user_id.clone(),
        created_at: now,
    };
    tracing::info!(user_id = %user_id, profile_id = %profile.id(), "Creating value profile");

    Ok((profile, Some(created.to_envelope().with_user_id(user_id.as_str()))))
}

/// Publishes events after a successful save. Failures are logged only; the
/// profile change has already been committed.
pub async fn publish_committed(publisher: &Arc<dyn EventPublisher>, events: Vec<EventEnvelope>) {
    if let Err(e) = publisher.publish_all(events).await {
        tracing::warn!(error = %e, "Failed to publish profile events");
    }
}
