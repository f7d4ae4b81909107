//! Composition root: wires ports, handlers and routes into one router.

use std::sync::Arc;

use axum::Router;

use crate::adapters::http::{api_router, MatchingHandlers, ProfileHandlers, SystemHandlers};
use crate::application::handlers::{
    ComputeMatchHandler, ConnectExternalSourceHandler, DeleteProfileHandler,
    DisconnectExternalSourceHandler, FindMatchesHandler, GetAuditVerdictHandler, GetProfileHandler,
    RecordNarrativeStepHandler, UpdateStatedValuesHandler,
};
use crate::domain::ethics::EthicalWeightTable;
use crate::domain::matching::{FairnessReview, MatchScorer, MeasureKind, Pseudonymizer};
use crate::ports::{AuditSink, AuditVerdictLog, EventPublisher, ValueProfileRepository};

/// Everything the HTTP surface needs, already built.
pub struct AppComponents {
    pub weights: Arc<EthicalWeightTable>,
    pub measure: MeasureKind,
    pub default_min_contribution: f64,
    pub max_candidates: usize,
    pub fairness: Arc<FairnessReview>,
    pub repository: Arc<dyn ValueProfileRepository>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub audit_sink: Arc<dyn AuditSink>,
    pub verdict_log: Arc<dyn AuditVerdictLog>,
    pub pseudonymizer: Pseudonymizer,
    pub verbose_errors: bool,
}

impl AppComponents {
    /// Builds the handlers and returns the routes without middleware.
    pub fn into_router(self) -> Router {
        let repository = self.repository;
        let publisher = self.event_publisher;
        let weights = self.weights;

        let profiles = ProfileHandlers::new(
            Arc::new(GetProfileHandler::new(repository.clone())),
            Arc::new(UpdateStatedValuesHandler::new(
                repository.clone(),
                weights.clone(),
                publisher.clone(),
            )),
            Arc::new(RecordNarrativeStepHandler::new(
                repository.clone(),
                weights.clone(),
                publisher.clone(),
            )),
            Arc::new(ConnectExternalSourceHandler::new(
                repository.clone(),
                weights.clone(),
                publisher.clone(),
            )),
            Arc::new(DisconnectExternalSourceHandler::new(
                repository.clone(),
                publisher.clone(),
            )),
            Arc::new(DeleteProfileHandler::new(repository.clone(), publisher.clone())),
        )
        .with_verbose_errors(self.verbose_errors);

        let scorer = MatchScorer::new(
            weights.clone(),
            self.measure.build(),
            self.default_min_contribution,
        );
        let compute = Arc::new(ComputeMatchHandler::new(
            repository.clone(),
            scorer,
            self.fairness,
            publisher,
            self.audit_sink,
            self.pseudonymizer,
        ));
        let matching = MatchingHandlers::new(
            compute.clone(),
            Arc::new(FindMatchesHandler::new(repository, compute, self.max_candidates)),
            Arc::new(GetAuditVerdictHandler::new(self.verdict_log)),
        )
        .with_verbose_errors(self.verbose_errors);

        let system = SystemHandlers::new(weights, self.measure.to_string());

        api_router(system, profiles, matching)
    }
}
