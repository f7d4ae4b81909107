//! HTTP routes for matching and audit endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{compute_match, find_matches, get_audit, MatchingHandlers};

/// Matching router, mounted under `/api`.
///
/// Both match routes share the `:user_a` segment name; the literal
/// `candidates` segment takes priority over `:user_b`.
pub fn matching_routes(handlers: MatchingHandlers) -> Router {
    Router::new()
        .route("/matches/:user_a/candidates", post(find_matches))
        .route("/matches/:user_a/:user_b", get(compute_match))
        .route("/audits/:match_id", get(get_audit))
        .with_state(handlers)
}
