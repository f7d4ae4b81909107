//! HTTP adapter for value profile endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    parse_value_map, ConnectSourceRequest, ConnectedSourceResponse, EffectiveValueResponse,
    ProfileResponse, RawValueMap, RecordNarrativeRequest, UpdateValuesRequest,
};
pub use handlers::ProfileHandlers;
pub use routes::profile_routes;
