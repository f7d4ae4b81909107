//! Value category and strength value objects.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::foundation::ValidationError;

/// A value/interest category drawn from the taxonomy (e.g. "Transparency").
///
/// Identity is case-insensitive: "Transparency" and "transparency" are the
/// same category. The label as first written is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ValueCategory {
    label: String,
    key: String,
}

impl ValueCategory {
    /// Creates a category from a label, trimming surrounding whitespace.
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::empty_field("category"));
        }
        Ok(Self {
            label: label.to_string(),
            key: label.to_lowercase(),
        })
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the case-folded identity key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for ValueCategory {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ValueCategory {}

impl Hash for ValueCategory {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for ValueCategory {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueCategory {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl TryFrom<String> for ValueCategory {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ValueCategory> for String {
    fn from(category: ValueCategory) -> Self {
        category.label
    }
}

/// How strongly a user holds a value, in `(0.0, 1.0]`.
///
/// Absence of a value is modelled by not having the category at all,
/// so zero is not a valid strength.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ValueStrength(f64);

impl ValueStrength {
    /// Full strength (1.0).
    pub const FULL: Self = Self(1.0);

    /// Creates a strength, rejecting non-finite or out-of-range values.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value <= 0.0 || value > 1.0 {
            return Err(ValidationError::out_of_range("strength", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ValueStrength {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ValueStrength> for f64 {
    fn from(strength: ValueStrength) -> Self {
        strength.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn category_identity_ignores_case() {
        let a = ValueCategory::new("Transparency").unwrap();
        let b = ValueCategory::new("  transparency ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), "transparency");
        assert_eq!(a.label(), "Transparency");
    }

    #[test]
    fn category_rejects_blank_label() {
        assert!(ValueCategory::new("   ").is_err());
    }

    #[test]
    fn category_orders_by_key() {
        let set: BTreeSet<_> = ["community", "Autonomy", "beauty"]
            .iter()
            .map(|s| ValueCategory::new(*s).unwrap())
            .collect();
        let labels: Vec<_> = set.iter().map(|c| c.label().to_string()).collect();
        assert_eq!(labels, vec!["Autonomy", "beauty", "community"]);
    }

    #[test]
    fn category_serializes_as_label() {
        let c = ValueCategory::new("Community").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"Community\"");
        assert!(serde_json::from_str::<ValueCategory>("\"\"").is_err());
    }

    #[test]
    fn strength_accepts_unit_interval() {
        assert!(ValueStrength::new(0.01).is_ok());
        assert!(ValueStrength::new(1.0).is_ok());
    }

    #[test]
    fn strength_rejects_out_of_range() {
        assert!(ValueStrength::new(0.0).is_err());
        assert!(ValueStrength::new(-0.5).is_err());
        assert!(ValueStrength::new(1.0001).is_err());
        assert!(ValueStrength::new(f64::NAN).is_err());
        assert!(ValueStrength::new(f64::INFINITY).is_err());
    }

    #[test]
    fn strength_deserialization_validates() {
        assert_eq!(
            serde_json::from_str::<ValueStrength>("0.5").unwrap().value(),
            0.5
        );
        assert!(serde_json::from_str::<ValueStrength>("2.0").is_err());
    }
}
