//! ConnectExternalSourceHandler - Connect or refresh an external data source.

use std::sync::Arc;

use crate::domain::ethics::EthicalWeightTable;
use crate::domain::foundation::{DomainError, EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::profile::{ExternalSourceConnected, ExternalSourceId, ValueMap, ValueProfile};
use crate::ports::{EventPublisher, ValueProfileRepository};

use super::common::{canonicalize, load_or_create, publish_committed};

/// Command to connect a consented external source with its current insights.
#[derive(Debug, Clone)]
pub struct ConnectExternalSourceCommand {
    pub user_id: UserId,
    pub source: ExternalSourceId,
    pub insights: ValueMap,
}

#[derive(Debug, Clone)]
pub struct ConnectExternalSourceResult {
    pub profile: ValueProfile,
    pub event: ExternalSourceConnected,
}

pub struct ConnectExternalSourceHandler {
    repository: Arc<dyn ValueProfileRepository>,
    weights: Arc<EthicalWeightTable>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ConnectExternalSourceHandler {
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
        cmd: ConnectExternalSourceCommand,
    ) -> Result<ConnectExternalSourceResult, DomainError> {
        let insights = canonicalize(&self.weights, cmd.insights)?;
        let now = Timestamp::now();

        let (mut profile, created) = load_or_create(&self.repository, &cmd.user_id, now).await?;
        let insight_count = insights.len();
        let refreshed = profile.connect_external_source(cmd.source.clone(), insights, now);

        self.repository.save(&profile).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            source = %cmd.source,
            refreshed,
            "External source connected"
        );

        let event = ExternalSourceConnected {
            event_id: EventId::new(),
            profile_id: profile.id(),
            user_id: cmd.user_id.clone(),
            version: profile.version(),
            source: cmd.source,
            refreshed,
            insight_count,
            connected_at: now,
        };

        let mut events: Vec<_> = created.into_iter().collect();
        events.push(event.to_envelope().with_user_id(cmd.user_id.as_str()));
        publish_committed(&self.event_publisher, events).await;

        Ok(ConnectExternalSourceResult { profile, event })
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::test_support::*;
    use super::*;

    fn cmd(insights: &[(&str, f64)]) -> ConnectExternalSourceCommand {
        ConnectExternalSourceCommand {
            user_id: user("alice"),
            source: ExternalSourceId::new("reading").unwrap(),
            insights: values(insights),
        }
    }

    #[tokio::test]
    async fn reconnecting_refreshes_insights() {
        let repo = Arc::new(MockProfileRepository::new());
        let h = ConnectExternalSourceHandler::new(
            repo.clone(),
            weights(),
            Arc::new(MockEventPublisher::new()),
        );

        let first = h.handle(cmd(&[("Community", 0.3)])).await.unwrap();
        let second = h.handle(cmd(&[("Community", 0.9), ("Innovation", 0.2)])).await.unwrap();

        assert!(!first.event.refreshed);
        assert!(second.event.refreshed);
        assert_eq!(second.event.insight_count, 2);

        let stored = repo.stored(&user("alice")).unwrap();
        let effective = stored.effective_values();
        assert_eq!(effective.len(), 2);
        assert_eq!(stored.connected_sources().len(), 1);
    }
}
