//! HTTP adapter for matching and audit endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AuditOutcomeResponse, ContributionResponse, FindMatchesRequest, MatchListResponse,
    MatchQueryParams, MatchResponse,
};
pub use handlers::MatchingHandlers;
pub use routes::matching_routes;
