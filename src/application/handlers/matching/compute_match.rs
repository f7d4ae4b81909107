//! ComputeMatchHandler - Query handler that scores two users.
//!
//! Scoring is synchronous and never waits on anything external. The match
//! event and audit record are fire-and-forget side effects.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, SerializableDomainEvent, UserId};
use crate::domain::matching::{
    AuditRecord, FairnessReview, MatchComputed, MatchContext, MatchResult, MatchScorer,
    Pseudonymizer,
};
use crate::domain::profile::ValueProfile;
use crate::ports::{AuditSink, EventPublisher, ValueProfileRepository};

use super::validate_context;

#[derive(Debug, Clone)]
pub struct ComputeMatchQuery {
    pub user_a: UserId,
    pub user_b: UserId,
    pub context: MatchContext,
}

pub struct ComputeMatchHandler {
    repository: Arc<dyn ValueProfileRepository>,
    scorer: MatchScorer,
    fairness: Arc<FairnessReview>,
    event_publisher: Arc<dyn EventPublisher>,
    audit_sink: Arc<dyn AuditSink>,
    pseudonymizer: Pseudonymizer,
}

impl ComputeMatchHandler {
    pub fn new(
        repository: Arc<dyn ValueProfileRepository>,
        scorer: MatchScorer,
        fairness: Arc<FairnessReview>,
        event_publisher: Arc<dyn EventPublisher>,
        audit_sink: Arc<dyn AuditSink>,
        pseudonymizer: Pseudonymizer,
    ) -> Self {
        Self {
            repository,
            scorer,
            fairness,
            event_publisher,
            audit_sink,
            pseudonymizer,
        }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub async fn handle(&self, query: ComputeMatchQuery) -> Result<MatchResult, DomainError> {
        if query.user_a == query.user_b {
            return Err(DomainError::validation(
                "user_b",
                "Cannot match a user against themselves",
            ));
        }

        let context = validate_context(self.scorer.weights(), query.context)?;
        let a = self.load(&query.user_a).await?;
        let b = self.load(&query.user_b).await?;

        Ok(self.evaluate(&a, &b, &context).await)
    }

    /// Scores two loaded profiles, reviews the result and emits side effects.
    pub async fn evaluate(
        &self,
        a: &ValueProfile,
        b: &ValueProfile,
        context: &MatchContext,
    ) -> MatchResult {
        let a_values = a.effective_values();
        let b_values = b.effective_values();

        let mut result = self
            .scorer
            .score(a.user_id(), &a_values, b.user_id(), &b_values, context);
        self.fairness.apply(&a_values, &b_values, &mut result);

        tracing::debug!(
            match_id = %result.match_id,
            user_a = %result.user_a,
            user_b = %result.user_b,
            score = result.score.value(),
            advisories = result.advisories.len(),
            "Match computed"
        );

        let envelope = MatchComputed::from_result(&result).to_envelope();
        if let Err(e) = self.event_publisher.publish(envelope).await {
            tracing::warn!(match_id = %result.match_id, error = %e, "Failed to publish match event");
        }

        let record = AuditRecord::from_result(&result, &self.pseudonymizer);
        if let Err(e) = self.audit_sink.submit(record) {
            tracing::warn!(match_id = %result.match_id, error = %e, "Audit record not submitted");
        }

        result
    }

    async fn load(&self, user_id: &UserId) -> Result<ValueProfile, DomainError> {
        self.repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::profile_not_found(user_id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::application::handlers::profile::test_support::*;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::domain::matching::{AdvisoryCode, MatchScore, SetOverlap};
    use crate::domain::profile::ValueCategory;
    use crate::ports::AuditSubmitError;
    use secrecy::Secret;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingAuditSink {
        pub records: Mutex<Vec<AuditRecord>>,
        pub full: bool,
    }

    impl AuditSink for RecordingAuditSink {
        fn submit(&self, record: AuditRecord) -> Result<(), AuditSubmitError> {
            if self.full {
                return Err(AuditSubmitError::QueueFull);
            }
            self.records.lock().unwrap().push(record);
            Ok(())
        }
    }

    pub fn profile_with(user_id: &str, stated: &[(&str, f64)]) -> ValueProfile {
        let mut profile = ValueProfile::new(user(user_id), Timestamp::now());
        profile.replace_stated_values(values(stated), Timestamp::now());
        profile
    }

    pub fn handler_with(
        repo: Arc<MockProfileRepository>,
        publisher: Arc<MockEventPublisher>,
        sink: Arc<RecordingAuditSink>,
    ) -> ComputeMatchHandler {
        ComputeMatchHandler::new(
            repo,
            MatchScorer::new(weights(), Arc::new(SetOverlap), 0.0),
            Arc::new(FairnessReview::default()),
            publisher,
            sink,
            Pseudonymizer::new(&Secret::new("test-secret".to_string())).unwrap(),
        )
    }

    fn reference_repo() -> Arc<MockProfileRepository> {
        Arc::new(MockProfileRepository::with(vec![
            profile_with("alice", &[("Transparency", 1.0), ("Community", 1.0)]),
            profile_with("bob", &[("Transparency", 1.0), ("Innovation", 1.0)]),
        ]))
    }

    fn query(a: &str, b: &str) -> ComputeMatchQuery {
        ComputeMatchQuery {
            user_a: user(a),
            user_b: user(b),
            context: MatchContext::default(),
        }
    }

    #[tokio::test]
    async fn computes_reference_match_with_side_effects() {
        let publisher = Arc::new(MockEventPublisher::new());
        let sink = Arc::new(RecordingAuditSink::default());
        let h = handler_with(reference_repo(), publisher.clone(), sink.clone());

        let result = h.handle(query("alice", "bob")).await.unwrap();

        assert!((result.score.value() - 42.857142857142854).abs() < 1e-9);
        assert_eq!(result.key_value_labels(), vec!["Transparency".to_string()]);
        assert_eq!(publisher.event_types(), vec!["match.computed.v1"]);

        let records = sink.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].match_id, result.match_id);
        assert_ne!(records[0].subject_a, "alice");
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let h = handler_with(
            reference_repo(),
            Arc::new(MockEventPublisher::new()),
            Arc::new(RecordingAuditSink::default()),
        );

        let err = h.handle(query("alice", "ghost")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProfileNotFound);
    }

    #[tokio::test]
    async fn matching_a_user_with_themselves_is_rejected() {
        let publisher = Arc::new(MockEventPublisher::new());
        let sink = Arc::new(RecordingAuditSink::default());
        let h = handler_with(reference_repo(), publisher.clone(), sink.clone());

        let err = h.handle(query("alice", "alice")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(publisher.event_types().is_empty());
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn side_effect_failures_do_not_fail_match() {
        let sink = Arc::new(RecordingAuditSink {
            full: true,
            ..Default::default()
        });
        let h = handler_with(reference_repo(), Arc::new(MockEventPublisher::failing()), sink);

        let result = h.handle(query("alice", "bob")).await.unwrap();
        assert!(result.score > MatchScore::ZERO);
    }

    #[tokio::test]
    async fn unknown_allow_list_category_is_rejected() {
        let h = handler_with(
            reference_repo(),
            Arc::new(MockEventPublisher::new()),
            Arc::new(RecordingAuditSink::default()),
        );
        let mut q = query("alice", "bob");
        q.context = MatchContext::default().with_allow_list([ValueCategory::new("Greed").unwrap()]);

        let err = h.handle(q).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownCategory);
    }

    #[tokio::test]
    async fn sparse_profiles_get_advisory_not_penalty() {
        let repo = Arc::new(MockProfileRepository::with(vec![
            profile_with("carol", &[("Transparency", 1.0)]),
            profile_with("dave", &[("Transparency", 0.5)]),
        ]));
        let h = handler_with(
            repo,
            Arc::new(MockEventPublisher::new()),
            Arc::new(RecordingAuditSink::default()),
        );

        let result = h.handle(query("carol", "dave")).await.unwrap();

        assert_eq!(result.score.value(), 100.0);
        assert!(result.has_advisory(AdvisoryCode::SparseProfile));
    }
}
