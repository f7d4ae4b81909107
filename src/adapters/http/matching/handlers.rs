//! HTTP handlers for matching and audit endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{domain_error_response, rejection_response};
use crate::application::handlers::matching::{
    ComputeMatchHandler, ComputeMatchQuery, FindMatchesHandler, FindMatchesQuery,
    GetAuditVerdictHandler, GetAuditVerdictQuery,
};
use crate::domain::foundation::{DomainError, MatchId, UserId};

use super::dto::{
    AuditOutcomeResponse, FindMatchesRequest, MatchListResponse, MatchQueryParams, MatchResponse,
};

#[derive(Clone)]
pub struct MatchingHandlers {
    compute_handler: Arc<ComputeMatchHandler>,
    find_handler: Arc<FindMatchesHandler>,
    audit_handler: Arc<GetAuditVerdictHandler>,
    verbose_errors: bool,
}

impl MatchingHandlers {
    pub fn new(
        compute_handler: Arc<ComputeMatchHandler>,
        find_handler: Arc<FindMatchesHandler>,
        audit_handler: Arc<GetAuditVerdictHandler>,
    ) -> Self {
        Self {
            compute_handler,
            find_handler,
            audit_handler,
            verbose_errors: false,
        }
    }

    pub fn with_verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    fn error(&self, error: DomainError) -> Response {
        domain_error_response(error, self.verbose_errors)
    }
}

/// GET /api/matches/:user_a/:user_b - Score two users
pub async fn compute_match(
    State(handlers): State<MatchingHandlers>,
    Path((user_a, user_b)): Path<(String, String)>,
    params: Result<Query<MatchQueryParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let query = match build_compute_query(user_a, user_b, params) {
        Ok(query) => query,
        Err(e) => return handlers.error(e),
    };

    match handlers.compute_handler.handle(query).await {
        Ok(result) => (StatusCode::OK, Json(MatchResponse::from(result))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// POST /api/matches/:user_id/candidates - Rank candidates for a user
pub async fn find_matches(
    State(handlers): State<MatchingHandlers>,
    Path(user_id): Path<String>,
    req: Result<Json<FindMatchesRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let query = match build_find_query(user_id, &req) {
        Ok(query) => query,
        Err(e) => return handlers.error(e),
    };
    let user_id = query.user_id.to_string();

    match handlers.find_handler.handle(query).await {
        Ok(results) => {
            let response = MatchListResponse {
                user_id,
                matches: results.into_iter().map(MatchResponse::from).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handlers.error(e),
    }
}

/// GET /api/audits/:match_id - External audit outcome, once recorded
pub async fn get_audit(
    State(handlers): State<MatchingHandlers>,
    Path(match_id): Path<String>,
) -> Response {
    let match_id = match match_id.parse::<MatchId>() {
        Ok(id) => id,
        Err(_) => {
            return handlers.error(DomainError::validation("match_id", "Invalid match ID"));
        }
    };

    match handlers
        .audit_handler
        .handle(GetAuditVerdictQuery { match_id })
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(AuditOutcomeResponse::from(outcome))).into_response(),
        Err(e) => handlers.error(e),
    }
}

fn build_compute_query(
    user_a: String,
    user_b: String,
    params: MatchQueryParams,
) -> Result<ComputeMatchQuery, DomainError> {
    Ok(ComputeMatchQuery {
        user_a: UserId::new(user_a)?,
        user_b: UserId::new(user_b)?,
        context: params.into_context()?,
    })
}

fn build_find_query(user_id: String, req: &FindMatchesRequest) -> Result<FindMatchesQuery, DomainError> {
    Ok(FindMatchesQuery {
        candidates: req.candidate_ids()?,
        min_score: req.min_score,
        limit: req.limit,
        context: req.context()?,
        ..FindMatchesQuery::for_user(UserId::new(user_id)?)
    })
}
