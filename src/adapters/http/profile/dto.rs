//! HTTP DTOs for value profile endpoints.
//!
//! Requests carry raw labels and strengths; conversion to domain types
//! happens here so invalid labels or strengths surface as a 400 with a
//! domain error body. Bodies that fail to deserialize are mapped to the
//! same body by the handlers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::profile::{ValueCategory, ValueMap, ValueProfile, ValueSource, ValueStrength};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Raw `label -> strength` map as sent by clients.
pub type RawValueMap = BTreeMap<String, f64>;

/// PUT /api/profiles/:user_id/values
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateValuesRequest {
    pub values: RawValueMap,
}

/// POST /api/profiles/:user_id/narrative
#[derive(Debug, Clone, Deserialize)]
pub struct RecordNarrativeRequest {
    pub step_id: String,
    #[serde(default)]
    pub traits: RawValueMap,
}

/// PUT /api/profiles/:user_id/sources/:source
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectSourceRequest {
    #[serde(default)]
    pub insights: RawValueMap,
}

/// Converts raw input into a value map.
///
/// Labels differing only by case are rejected rather than silently merged.
pub fn parse_value_map(raw: RawValueMap) -> Result<ValueMap, DomainError> {
    let mut values = ValueMap::new();
    for (label, strength) in raw {
        let category = ValueCategory::new(label)?;
        let strength = ValueStrength::new(strength)?;
        if values.contains_key(&category) {
            return Err(DomainError::validation(
                "values",
                format!("'{}' is listed more than once", category.label()),
            ));
        }
        values.insert(category, strength);
    }
    Ok(values)
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveValueResponse {
    pub category: String,
    pub strength: f64,
    pub sources: Vec<ValueSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedSourceResponse {
    pub source: String,
    pub categories: Vec<String>,
    pub consented_at: Timestamp,
    pub refreshed_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile_id: String,
    pub user_id: String,
    pub version: u32,
    /// Max strength per category across every source.
    pub values: Vec<EffectiveValueResponse>,
    pub stated_values: BTreeMap<String, f64>,
    pub narrative_steps: Vec<String>,
    pub connected_sources: Vec<ConnectedSourceResponse>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&ValueProfile> for ProfileResponse {
    fn from(profile: &ValueProfile) -> Self {
        let values = profile
            .effective_values()
            .into_iter()
            .map(|(category, strength)| EffectiveValueResponse {
                sources: profile.sources_of(&category),
                category: category.label().to_string(),
                strength: strength.value(),
            })
            .collect();

        let sources = profile.sources();
        let stated_values = labelled(&sources.stated);
        let narrative_steps = sources.narrative.keys().map(|s| s.to_string()).collect();
        let connected_sources = sources
            .external
            .iter()
            .map(|(source, external)| ConnectedSourceResponse {
                source: source.to_string(),
                categories: external
                    .insights
                    .keys()
                    .map(|c| c.label().to_string())
                    .collect(),
                consented_at: external.consented_at,
                refreshed_at: external.refreshed_at,
            })
            .collect();

        Self {
            profile_id: profile.id().to_string(),
            user_id: profile.user_id().to_string(),
            version: profile.version(),
            values,
            stated_values,
            narrative_steps,
            connected_sources,
            created_at: profile.created_at(),
            updated_at: profile.updated_at(),
        }
    }
}

fn labelled(values: &ValueMap) -> BTreeMap<String, f64> {
    values
        .iter()
        .map(|(c, s)| (c.label().to_string(), s.value()))
        .collect()
}
