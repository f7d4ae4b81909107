//! RecordNarrativeStepHandler - Command handler for onboarding narrative steps.

use std::sync::Arc;

use crate::domain::ethics::EthicalWeightTable;
use crate::domain::foundation::{DomainError, EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::profile::{NarrativeStepCompleted, NarrativeStepId, ValueMap, ValueProfile};
use crate::ports::{EventPublisher, ValueProfileRepository};

use super::common::{canonicalize, load_or_create, publish_committed};

/// Command to record the traits derived from one onboarding step.
#[derive(Debug, Clone)]
pub struct RecordNarrativeStepCommand {
    pub user_id: UserId,
    pub step_id: NarrativeStepId,
    pub traits: ValueMap,
}

#[derive(Debug, Clone)]
pub struct RecordNarrativeStepResult {
    pub profile: ValueProfile,
    pub event: NarrativeStepCompleted,
}

pub struct RecordNarrativeStepHandler {
    repository: Arc<dyn ValueProfileRepository>,
    weights: Arc<EthicalWeightTable>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RecordNarrativeStepHandler {
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
        cmd: RecordNarrativeStepCommand,
    ) -> Result<RecordNarrativeStepResult, DomainError> {
        let traits = canonicalize(&self.weights, cmd.traits)?;
        let now = Timestamp::now();

        let (mut profile, created) = load_or_create(&self.repository, &cmd.user_id, now).await?;
        let trait_list: Vec<_> = traits.keys().cloned().collect();
        let redone = profile.record_narrative_step(cmd.step_id.clone(), traits, now);

        self.repository.save(&profile).await?;

        let event = NarrativeStepCompleted {
            event_id: EventId::new(),
            profile_id: profile.id(),
            user_id: cmd.user_id.clone(),
            version: profile.version(),
            step_id: cmd.step_id,
            redone,
            traits: trait_list,
            completed_at: now,
        };

        let mut events: Vec<_> = created.into_iter().collect();
        events.push(event.to_envelope().with_user_id(cmd.user_id.as_str()));
        publish_committed(&self.event_publisher, events).await;

        Ok(RecordNarrativeStepResult { profile, event })
    }
}
