//! HTTP handlers for value profile endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{domain_error_response, rejection_response};
use crate::application::handlers::profile::{
    ConnectExternalSourceCommand, ConnectExternalSourceHandler, DeleteProfileCommand,
    DeleteProfileHandler, DisconnectExternalSourceCommand, DisconnectExternalSourceHandler,
    GetProfileHandler, GetProfileQuery, RecordNarrativeStepCommand, RecordNarrativeStepHandler,
    UpdateStatedValuesCommand, UpdateStatedValuesHandler,
};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::profile::{ExternalSourceId, NarrativeStepId};

use super::dto::{
    parse_value_map, ConnectSourceRequest, ProfileResponse, RecordNarrativeRequest,
    UpdateValuesRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ProfileHandlers {
    get_handler: Arc<GetProfileHandler>,
    update_values_handler: Arc<UpdateStatedValuesHandler>,
    narrative_handler: Arc<RecordNarrativeStepHandler>,
    connect_handler: Arc<ConnectExternalSourceHandler>,
    disconnect_handler: Arc<DisconnectExternalSourceHandler>,
    delete_handler: Arc<DeleteProfileHandler>,
    verbose_errors: bool,
}

impl ProfileHandlers {
    pub fn new(
        get_handler: Arc<GetProfileHandler>,
        update_values_handler: Arc<UpdateStatedValuesHandler>,
        narrative_handler: Arc<RecordNarrativeStepHandler>,
        connect_handler: Arc<ConnectExternalSourceHandler>,
        disconnect_handler: Arc<DisconnectExternalSourceHandler>,
        delete_handler: Arc<DeleteProfileHandler>,
    ) -> Self {
        Self {
            get_handler,
            update_values_handler,
            narrative_handler,
            connect_handler,
            disconnect_handler,
            delete_handler,
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

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/profiles/:user_id - Effective profile with provenance
pub async fn get_profile(
    State(handlers): State<ProfileHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match UserId::new(user_id) {
        Ok(id) => id,
        Err(e) => return handlers.error(e.into()),
    };

    match handlers.get_handler.handle(GetProfileQuery { user_id }).await {
        Ok(profile) => (StatusCode::OK, Json(ProfileResponse::from(&profile))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// PUT /api/profiles/:user_id/values - Replace stated values
///
/// Responds 201 when this call created the profile.
pub async fn update_values(
    State(handlers): State<ProfileHandlers>,
    Path(user_id): Path<String>,
    req: Result<Json<UpdateValuesRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let cmd = match (UserId::new(user_id), parse_value_map(req.values)) {
        (Ok(user_id), Ok(values)) => UpdateStatedValuesCommand { user_id, values },
        (Err(e), _) => return handlers.error(e.into()),
        (_, Err(e)) => return handlers.error(e),
    };

    match handlers.update_values_handler.handle(cmd).await {
        Ok(result) => {
            let status = if result.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(ProfileResponse::from(&result.profile))).into_response()
        }
        Err(e) => handlers.error(e),
    }
}

/// POST /api/profiles/:user_id/narrative - Record an onboarding step
pub async fn record_narrative(
    State(handlers): State<ProfileHandlers>,
    Path(user_id): Path<String>,
    req: Result<Json<RecordNarrativeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let cmd = match build_narrative_command(user_id, req) {
        Ok(cmd) => cmd,
        Err(e) => return handlers.error(e),
    };

    match handlers.narrative_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(ProfileResponse::from(&result.profile))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// PUT /api/profiles/:user_id/sources/:source - Connect or refresh a source
pub async fn connect_source(
    State(handlers): State<ProfileHandlers>,
    Path((user_id, source)): Path<(String, String)>,
    req: Result<Json<ConnectSourceRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match req {
        Ok(req) => req,
        Err(rejection) => return rejection_response(rejection.body_text()),
    };
    let cmd = match build_connect_command(user_id, source, req) {
        Ok(cmd) => cmd,
        Err(e) => return handlers.error(e),
    };

    match handlers.connect_handler.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(ProfileResponse::from(&result.profile))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// DELETE /api/profiles/:user_id/sources/:source - Disconnect a source
pub async fn disconnect_source(
    State(handlers): State<ProfileHandlers>,
    Path((user_id, source)): Path<(String, String)>,
) -> Response {
    let cmd = match (UserId::new(user_id), ExternalSourceId::new(source)) {
        (Ok(user_id), Ok(source)) => DisconnectExternalSourceCommand { user_id, source },
        (Err(e), _) | (_, Err(e)) => return handlers.error(e.into()),
    };

    match handlers.disconnect_handler.handle(cmd).await {
        Ok(profile) => (StatusCode::OK, Json(ProfileResponse::from(&profile))).into_response(),
        Err(e) => handlers.error(e),
    }
}

/// DELETE /api/profiles/:user_id - Delete a profile and all its sources
pub async fn delete_profile(
    State(handlers): State<ProfileHandlers>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match UserId::new(user_id) {
        Ok(id) => id,
        Err(e) => return handlers.error(e.into()),
    };

    match handlers.delete_handler.handle(DeleteProfileCommand { user_id }).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handlers.error(e),
    }
}

fn build_narrative_command(
    user_id: String,
    req: RecordNarrativeRequest,
) -> Result<RecordNarrativeStepCommand, DomainError> {
    Ok(RecordNarrativeStepCommand {
        user_id: UserId::new(user_id)?,
        step_id: NarrativeStepId::new(req.step_id)?,
        traits: parse_value_map(req.traits)?,
    })
}

fn build_connect_command(
    user_id: String,
    source: String,
    req: ConnectSourceRequest,
) -> Result<ConnectExternalSourceCommand, DomainError> {
    Ok(ConnectExternalSourceCommand {
        user_id: UserId::new(user_id)?,
        source: ExternalSourceId::new(source)?,
        insights: parse_value_map(req.insights)?,
    })
}
