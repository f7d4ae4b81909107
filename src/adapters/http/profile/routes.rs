//! HTTP routes for value profile endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    connect_source, delete_profile, disconnect_source, get_profile, record_narrative,
    update_values, ProfileHandlers,
};

/// Profile router, mounted under `/api/profiles`.
///
/// # Routes
/// - `GET /:user_id` - effective profile
/// - `DELETE /:user_id` - delete profile
/// - `PUT /:user_id/values` - replace stated values
/// - `POST /:user_id/narrative` - record an onboarding step
/// - `PUT /:user_id/sources/:source` - connect or refresh a source
/// - `DELETE /:user_id/sources/:source` - disconnect a source
pub fn profile_routes(handlers: ProfileHandlers) -> Router {
    Router::new()
        .route("/:user_id", get(get_profile).delete(delete_profile))
        .route("/:user_id/values", put(update_values))
        .route("/:user_id/narrative", post(record_narrative))
        .route(
            "/:user_id/sources/:source",
            put(connect_source).delete(disconnect_source),
        )
        .with_state(handlers)
}
