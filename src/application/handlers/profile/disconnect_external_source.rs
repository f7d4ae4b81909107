//! DisconnectExternalSourceHandler - Revoke an external source and drop its insights.

use std::sync::Arc;

use crate::domain::foundation::{
    DomainError, ErrorCode, EventId, SerializableDomainEvent, Timestamp, UserId,
};
use crate::domain::profile::{ExternalSourceDisconnected, ExternalSourceId, ValueProfile};
use crate::ports::{EventPublisher, ValueProfileRepository};

use super::common::publish_committed;

#[derive(Debug, Clone)]
pub struct DisconnectExternalSourceCommand {
    pub user_id: UserId,
    pub source: ExternalSourceId,
}

pub struct DisconnectExternalSourceHandler {
    repository: Arc<dyn ValueProfileRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl DisconnectExternalSourceHandler {
    pub fn new(
        repository: Arc<dyn ValueProfileRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    /// Fails with `NotFound` if the source is not connected.
    pub async fn handle(
        &self,
        cmd: DisconnectExternalSourceCommand,
    ) -> Result<ValueProfile, DomainError> {
        let mut profile = self
            .repository
            .find_by_user(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::profile_not_found(&cmd.user_id))?;

        let now = Timestamp::now();
        if !profile.disconnect_external_source(&cmd.source, now) {
            return Err(DomainError::new(
                ErrorCode::NotFound,
                format!("External source '{}' is not connected", cmd.source),
            )
            .with_detail("source", cmd.source.as_str()));
        }

        self.repository.save(&profile).await?;

        tracing::info!(user_id = %cmd.user_id, source = %cmd.source, "External source disconnected");

        let event = ExternalSourceDisconnected {
            event_id: EventId::new(),
            profile_id: profile.id(),
            user_id: cmd.user_id.clone(),
            version: profile.version(),
            source: cmd.source,
            disconnected_at: now,
        };
        publish_committed(
            &self.event_publisher,
            vec![event.to_envelope().with_user_id(cmd.user_id.as_str())],
        )
        .await;

        Ok(profile)
    }
}
