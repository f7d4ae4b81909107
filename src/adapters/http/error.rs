//! JSON error bodies and the mapping from domain errors to HTTP statuses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode};

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed.to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Builds the body for a domain error.
    ///
    /// Server-side failures keep their code but lose message and details
    /// unless `verbose` is set.
    pub fn from_domain(error: &DomainError, verbose: bool) -> Self {
        if status_for(error.code()).is_server_error() && !verbose {
            return Self {
                code: error.code().to_string(),
                message: "Internal server error".to_string(),
                details: None,
            };
        }

        let details = (!error.details.is_empty()).then(|| {
            serde_json::Value::Object(
                error
                    .details
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            )
        });

        Self {
            code: error.code().to_string(),
            message: error.message().to_string(),
            details,
        }
    }
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::UnknownCategory => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound | ErrorCode::ProfileNotFound => StatusCode::NOT_FOUND,
        ErrorCode::ConcurrencyConflict => StatusCode::CONFLICT,
        ErrorCode::VerificationUnavailable | ErrorCode::DatabaseError | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Converts a body or query extractor rejection into a 400 error body.
pub fn rejection_response(message: String) -> Response {
    tracing::debug!(reason = %message, "Rejected malformed request");
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(message))).into_response()
}

/// Converts a domain error into a response, logging server-side failures.
pub fn domain_error_response(error: DomainError, verbose: bool) -> Response {
    let status = status_for(error.code());
    if status.is_server_error() {
        tracing::error!(code = %error.code(), error = %error, "Request failed");
    }
    (status, Json(ErrorResponse::from_domain(&error, verbose))).into_response()
}
