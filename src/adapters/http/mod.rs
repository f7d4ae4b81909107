//! HTTP adapters - REST API over the application handlers.
//!
//! - `system` - liveness and the weight table
//! - `profile` - value profile commands and queries
//! - `matching` - match computation, candidate ranking, audit lookup

pub mod error;
pub mod matching;
pub mod profile;
pub mod system;

pub use error::{domain_error_response, status_for, ErrorResponse};
pub use matching::{matching_routes, MatchingHandlers};
pub use profile::{profile_routes, ProfileHandlers};
pub use system::{health_routes, weight_routes, SystemHandlers};

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::Router;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// Assembles every route without middleware.
pub fn api_router(
    system: SystemHandlers,
    profiles: ProfileHandlers,
    matching: MatchingHandlers,
) -> Router {
    let api = Router::new()
        .merge(weight_routes(system.clone()))
        .nest("/profiles", profile_routes(profiles))
        .merge(matching_routes(matching));

    Router::new()
        .merge(health_routes(system))
        .nest("/api", api)
}

/// Wraps a router with request timeout, CORS and (optionally) request tracing.
pub fn with_middleware(router: Router, server: &ServerConfig, trace_requests: bool) -> Router {
    let router = router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(&server.cors_origins_list()));

    if trace_requests {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
}
