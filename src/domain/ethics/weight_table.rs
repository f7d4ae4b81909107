//! Ethical Weight Table - the centrally configured priority of each value.
//!
//! The table doubles as the value taxonomy: a category that is not in the
//! table is not a category the matcher knows about. It is loaded once at
//! startup, validated, and shared read-only for the life of the process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::domain::profile::ValueCategory;

/// Errors detected while building a weight table.
///
/// Any of these is a configuration error and must stop the service at
/// startup rather than surface per request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightTableError {
    #[error("Ethical weight table is empty")]
    Empty,

    #[error("Ethical weight table contains a blank category name")]
    BlankCategory,

    #[error("Weight for '{category}' must be in (0, 1], got {weight}")]
    WeightOutOfRange { category: String, weight: f64 },

    #[error("Category '{category}' appears more than once (names are case-insensitive)")]
    DuplicateCategory { category: String },

    #[error("Cannot read weight file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Cannot parse weight file {path}: {reason}")]
    Unparsable { path: String, reason: String },

    #[error("Unsupported weight file format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: String },
}

/// Priority weight of a value category, in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EthicalWeight(f64);

impl EthicalWeight {
    pub fn new(weight: f64) -> Option<Self> {
        (weight.is_finite() && weight > 0.0 && weight <= 1.0).then_some(Self(weight))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for EthicalWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only mapping from value category to ethical weight.
#[derive(Debug, Clone, PartialEq)]
pub struct EthicalWeightTable {
    weights: BTreeMap<ValueCategory, EthicalWeight>,
}

impl EthicalWeightTable {
    /// Builds a table from raw `(name, weight)` pairs, failing on the first
    /// invalid entry.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, WeightTableError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut weights = BTreeMap::new();

        for (name, raw) in entries {
            let category =
                ValueCategory::new(name.as_ref()).map_err(|_| WeightTableError::BlankCategory)?;
            let weight =
                EthicalWeight::new(raw).ok_or_else(|| WeightTableError::WeightOutOfRange {
                    category: category.label().to_string(),
                    weight: raw,
                })?;

            if weights.contains_key(&category) {
                return Err(WeightTableError::DuplicateCategory {
                    category: category.label().to_string(),
                });
            }
            weights.insert(category, weight);
        }

        if weights.is_empty() {
            return Err(WeightTableError::Empty);
        }

        Ok(Self { weights })
    }

    /// Returns the weight of a category, if it is part of the taxonomy.
    pub fn weight_of(&self, category: &ValueCategory) -> Option<EthicalWeight> {
        self.weights.get(category).copied()
    }

    /// Returns the canonical (table-defined) label for a category.
    pub fn canonical(&self, category: &ValueCategory) -> Option<&ValueCategory> {
        self.weights.get_key_value(category).map(|(k, _)| k)
    }

    /// Returns true if the category is part of the taxonomy.
    pub fn contains(&self, category: &ValueCategory) -> bool {
        self.weights.contains_key(category)
    }

    /// Returns the categories not present in the table, in input order.
    pub fn unknown<'a, I>(&self, categories: I) -> Vec<&'a ValueCategory>
    where
        I: IntoIterator<Item = &'a ValueCategory>,
    {
        categories.into_iter().filter(|c| !self.contains(c)).collect()
    }

    /// Iterates entries in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&ValueCategory, EthicalWeight)> {
        self.weights.iter().map(|(c, w)| (c, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Returns a copy with one weight replaced.
    ///
    /// Only used to test how a score responds to weighting; the live table
    /// is never mutated.
    pub fn with_weight(&self, category: &ValueCategory, weight: EthicalWeight) -> Self {
        let mut weights = self.weights.clone();
        let key = self
            .canonical(category)
            .cloned()
            .unwrap_or_else(|| category.clone());
        weights.insert(key, weight);
        Self { weights }
    }
}
