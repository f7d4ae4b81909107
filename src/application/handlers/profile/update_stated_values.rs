//! UpdateStatedValuesHandler - Command handler for replacing stated values.

use std::sync::Arc;

use crate::domain::ethics::EthicalWeightTable;
use crate::domain::foundation::{DomainError, EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::profile::{StatedValuesUpdated, ValueMap, ValueProfile};
use crate::ports::{EventPublisher, ValueProfileRepository};

use super::common::{canonicalize, load_or_create, publish_committed};

/// Command to replace a user's stated values.
#[derive(Debug, Clone)]
pub struct UpdateStatedValuesCommand {
    pub user_id: UserId,
    pub values: ValueMap,
}

#[derive(Debug, Clone)]
pub struct UpdateStatedValuesResult {
    pub profile: ValueProfile,
    pub created: bool,
    pub event: StatedValuesUpdated,
}

pub struct UpdateStatedValuesHandler {
    repository: Arc<dyn ValueProfileRepository>,
    weights: Arc<EthicalWeightTable>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateStatedValuesHandler {
    pub fn new(
        repository: Arc<dyn ValueProfileRepository>,
        weights: Arc<EthicalWeightTable>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            weights,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdateStatedValuesCommand,
    ) -> Result<UpdateStatedValuesResult, DomainError> {
        let values = canonicalize(&self.weights, cmd.values)?;
        let now = Timestamp::now();

        let (mut profile, created) = load_or_create(&self.repository, &cmd.user_id, now).await?;
        let categories: Vec<_> = values.keys().cloned().collect();
        profile.replace_stated_values(values, now);

        self.repository.save(&profile).await?;

        let event = StatedValuesUpdated {
            event_id: EventId::new(),
            profile_id: profile.id(),
            user_id: cmd.user_id.clone(),
            version: profile.version(),
            categories,
            updated_at: now,
        };

        let mut events: Vec<_> = created.iter().cloned().collect();
        events.push(event.to_envelope().with_user_id(cmd.user_id.as_str()));
        publish_committed(&self.event_publisher, events).await;

        tracing::debug!(user_id = %cmd.user_id, version = profile.version(), "Stated values replaced");

        Ok(UpdateStatedValuesResult {
            profile,
            created: created.is_some(),
            event,
        })
    }
}
