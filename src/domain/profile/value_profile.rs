//! ValueProfile aggregate root.
//!
//! A profile collects value contributions from three kinds of source and
//! exposes a single effective view to the matcher:
//!
//! - **Stated** values the user edits directly in profile settings
//! - **Narrative** traits derived from onboarding steps, keyed by step
//! - **External** insights from a consented third-party connection
//!
//! The effective strength of a category is the maximum across every
//! source that contributes it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::{Timestamp, UserId, ValidationError, ValueProfileId};

use super::category::{ValueCategory, ValueStrength};

/// Category-to-strength map used for every source and the effective view.
pub type ValueMap = BTreeMap<ValueCategory, ValueStrength>;

/// Identifier of an onboarding narrative step (e.g. "crossroads-1").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NarrativeStepId(String);

impl NarrativeStepId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::empty_field("step_id"));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NarrativeStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NarrativeStepId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NarrativeStepId> for String {
    fn from(id: NarrativeStepId) -> Self {
        id.0
    }
}

/// Identifier of an external data source (e.g. "goodreads", "spotify").
///
/// Lowercase ASCII letters, digits, `-` and `_` only, so it is safe in URLs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalSourceId(String);

impl ExternalSourceId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id: String = id.into();
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return Err(ValidationError::empty_field("source"));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::invalid_format(
                "source",
                "only letters, digits, '-' and '_' are allowed",
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ExternalSourceId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExternalSourceId> for String {
    fn from(id: ExternalSourceId) -> Self {
        id.0
    }
}

/// Insights imported from one external source, with the consent that allows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalInsights {
    pub insights: ValueMap,
    pub consented_at: Timestamp,
    pub refreshed_at: Timestamp,
}

/// Where a contribution to the effective profile came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ValueSource {
    Stated,
    Narrative(NarrativeStepId),
    External(ExternalSourceId),
}

/// All per-source contributions; the persisted body of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSources {
    #[serde(default)]
    pub stated: ValueMap,
    #[serde(default)]
    pub narrative: BTreeMap<NarrativeStepId, ValueMap>,
    #[serde(default)]
    pub external: BTreeMap<ExternalSourceId, ExternalInsights>,
}

impl ProfileSources {
    /// Iterates every category mentioned by any source.
    pub fn categories(&self) -> impl Iterator<Item = &ValueCategory> {
        self.stated
            .keys()
            .chain(self.narrative.values().flat_map(|m| m.keys()))
            .chain(self.external.values().flat_map(|e| e.insights.keys()))
    }
}

/// A user's value profile.
///
/// # Invariants
///
/// 1. Each profile belongs to exactly one user
/// 2. External insights exist only while their source is connected
/// 3. Version only increases; every mutation bumps it by one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueProfile {
    id: ValueProfileId,
    user_id: UserId,
    version: u32,
    sources: ProfileSources,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ValueProfile {
    /// Creates an empty profile for a user at version 1.
    pub fn new(user_id: UserId, now: Timestamp) -> Self {
        Self {
            id: ValueProfileId::new(),
            user_id,
            version: 1,
            sources: ProfileSources::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a profile from persistence (no validation).
    pub fn reconstitute(
        id: ValueProfileId,
        user_id: UserId,
        version: u32,
        sources: ProfileSources,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            version,
            sources,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ValueProfileId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn sources(&self) -> &ProfileSources {
        &self.sources
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns true if the user owns this profile.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Replaces the user's stated values.
    ///
    /// Returns the previous stated set.
    pub fn replace_stated_values(&mut self, values: ValueMap, now: Timestamp) -> ValueMap {
        let previous = std::mem::replace(&mut self.sources.stated, values);
        self.touch(now);
        previous
    }

    /// Records the traits derived from one onboarding step.
    ///
    /// Redoing a step replaces its earlier traits. Returns true if the step
    /// had been completed before.
    pub fn record_narrative_step(
        &mut self,
        step_id: NarrativeStepId,
        traits: ValueMap,
        now: Timestamp,
    ) -> bool {
        let redone = self.sources.narrative.insert(step_id, traits).is_some();
        self.touch(now);
        redone
    }

    /// Connects (or refreshes) an external source with its current insights.
    ///
    /// The original consent time survives a refresh. Returns true on refresh.
    pub fn connect_external_source(
        &mut self,
        source: ExternalSourceId,
        insights: ValueMap,
        now: Timestamp,
    ) -> bool {
        let consented_at = self
            .sources
            .external
            .get(&source)
            .map(|existing| existing.consented_at)
            .unwrap_or(now);
        let refreshed = self.sources.external.contains_key(&source);

        self.sources.external.insert(
            source,
            ExternalInsights {
                insights,
                consented_at,
                refreshed_at: now,
            },
        );
        self.touch(now);
        refreshed
    }

    /// Disconnects an external source, dropping its insights.
    ///
    /// Returns false (and leaves the profile untouched) if it was not connected.
    pub fn disconnect_external_source(&mut self, source: &ExternalSourceId, now: Timestamp) -> bool {
        if self.sources.external.remove(source).is_none() {
            return false;
        }
        self.touch(now);
        true
    }

    /// Returns the connected external sources.
    pub fn connected_sources(&self) -> Vec<&ExternalSourceId> {
        self.sources.external.keys().collect()
    }

    /// Effective strength per category: the maximum across all sources.
    pub fn effective_values(&self) -> ValueMap {
        let mut effective = ValueMap::new();

        let contributions = self
            .sources
            .stated
            .iter()
            .chain(self.sources.narrative.values().flat_map(|m| m.iter()))
            .chain(
                self.sources
                    .external
                    .values()
                    .flat_map(|e| e.insights.iter()),
            );

        for (category, strength) in contributions {
            effective
                .entry(category.clone())
                .and_modify(|current: &mut ValueStrength| {
                    if strength.value() > current.value() {
                        *current = *strength;
                    }
                })
                .or_insert(*strength);
        }

        effective
    }

    /// Sources that contribute a given category, for explanation views.
    pub fn sources_of(&self, category: &ValueCategory) -> Vec<ValueSource> {
        let mut found = Vec::new();
        if self.sources.stated.contains_key(category) {
            found.push(ValueSource::Stated);
        }
        for (step, traits) in &self.sources.narrative {
            if traits.contains_key(category) {
                found.push(ValueSource::Narrative(step.clone()));
            }
        }
        for (source, external) in &self.sources.external {
            if external.insights.contains_key(category) {
                found.push(ValueSource::External(source.clone()));
            }
        }
        found
    }

    /// Number of categories in the effective view.
    pub fn category_count(&self) -> usize {
        self.effective_values().len()
    }

    fn touch(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }
}
