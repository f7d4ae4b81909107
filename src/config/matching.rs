//! Matching configuration: ethical weights, similarity measure, thresholds.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::ethics::{EthicalWeightTable, WeightTableError};
use crate::domain::matching::{
    MeasureKind, DEFAULT_DOMINANCE_THRESHOLD, DEFAULT_MIN_PROFILE_CATEGORIES,
};

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// YAML or JSON file mapping category name to weight. Wins over `weights`.
    pub weights_path: Option<String>,

    /// Inline weights (`THINKALIKE__MATCHING__WEIGHTS__<NAME>=<w>`).
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,

    #[serde(default)]
    pub measure: MeasureKind,

    /// Threshold for key shared values when a request gives none.
    #[serde(default)]
    pub default_min_contribution: f64,

    #[serde(default = "default_dominance_threshold")]
    pub dominance_threshold: f64,

    #[serde(default = "default_min_profile_categories")]
    pub min_profile_categories: usize,

    /// Upper bound on candidates scanned by a single ranking request.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl MatchingConfig {
    /// Loads and validates the ethical weight table.
    pub fn load_weight_table(&self) -> Result<EthicalWeightTable, WeightTableError> {
        match &self.weights_path {
            Some(path) => load_weight_file(Path::new(path)),
            None => EthicalWeightTable::from_entries(
                self.weights.iter().map(|(name, weight)| (name.as_str(), *weight)),
            ),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.default_min_contribution.is_finite() || self.default_min_contribution < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "matching.default_min_contribution",
                range: "[0, 1]",
            });
        }
        if !(self.dominance_threshold > 0.0 && self.dominance_threshold <= 1.0) {
            return Err(ValidationError::OutOfRange {
                field: "matching.dominance_threshold",
                range: "(0, 1]",
            });
        }
        if self.max_candidates == 0 {
            return Err(ValidationError::OutOfRange {
                field: "matching.max_candidates",
                range: "1..",
            });
        }
        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights_path: None,
            weights: BTreeMap::new(),
            measure: MeasureKind::default(),
            default_min_contribution: 0.0,
            dominance_threshold: default_dominance_threshold(),
            min_profile_categories: default_min_profile_categories(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn load_weight_file(path: &Path) -> Result<EthicalWeightTable, WeightTableError> {
    let display = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| WeightTableError::Unreadable {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let entries: BTreeMap<String, f64> = match extension.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents).map_err(|e| {
            WeightTableError::Unparsable {
                path: display.clone(),
                reason: e.to_string(),
            }
        })?,
        Some("json") => serde_json::from_str(&contents).map_err(|e| {
            WeightTableError::Unparsable {
                path: display.clone(),
                reason: e.to_string(),
            }
        })?,
        _ => return Err(WeightTableError::UnsupportedFormat { path: display }),
    };

    EthicalWeightTable::from_entries(entries)
}

fn default_dominance_threshold() -> f64 {
    DEFAULT_DOMINANCE_THRESHOLD
}

fn default_min_profile_categories() -> usize {
    DEFAULT_MIN_PROFILE_CATEGORIES
}

fn default_max_candidates() -> usize {
    200
}
