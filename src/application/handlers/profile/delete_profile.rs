//! DeleteProfileHandler - Remove a user's value profile entirely.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::profile::ValueProfileDeleted;
use crate::ports::{EventPublisher, ValueProfileRepository};

use super::common::publish_committed;

#[derive(Debug, Clone)]
pub struct DeleteProfileCommand {
    pub user_id: UserId,
}

pub struct DeleteProfileHandler {
    repository: Arc<dyn ValueProfileRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DeleteProfileHandler {
    pub fn new(
        repository: Arc<dyn ValueProfileRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: DeleteProfileCommand) -> Result<(), DomainError> {
        let profile = self
            .repository
            .find_by_user(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::profile_not_found(&cmd.user_id))?;

        if !self.repository.delete_by_user(&cmd.user_id).await? {
            return Err(DomainError::profile_not_found(&cmd.user_id));
        }

        tracing::info!(user_id = %cmd.user_id, "Value profile deleted");

        let event = ValueProfileDeleted {
            event_id: EventId::new(),
            profile_id: profile.id(),
            user_id: cmd.user_id.clone(),
            deleted_at: Timestamp::now(),
        };
        publish_committed(
            &self.event_publisher,
            vec![event.to_envelope().with_user_id(cmd.user_id.as_str())],
        )
        .await;

        Ok(())
    }
}
