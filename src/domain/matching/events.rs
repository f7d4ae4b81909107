//! Matching domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, MatchId, Timestamp, UserId};

use super::result::MatchResult;

/// Published whenever a match score is computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchComputed {
    pub event_id: EventId,
    pub match_id: MatchId,
    pub user_a: UserId,
    pub user_b: UserId,
    pub score: f64,
    pub key_shared_values: Vec<String>,
    pub computed_at: Timestamp,
}

impl MatchComputed {
    pub fn from_result(result: &MatchResult) -> Self {
        Self {
            event_id: EventId::new(),
            match_id: result.match_id,
            user_a: result.user_a.clone(),
            user_b: result.user_b.clone(),
            score: result.score.value(),
            key_shared_values: result.key_value_labels(),
            computed_at: result.computed_at,
        }
    }
}

domain_event!(
    MatchComputed,
    event_type = "match.computed.v1",
    aggregate_id = match_id,
    aggregate_type = "Match",
    occurred_at = computed_at,
    event_id = event_id
);
