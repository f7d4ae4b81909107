//! Audit records sent to the external Verification System.
//!
//! Records carry no raw user ids. Each user is replaced by a keyed
//! HMAC-SHA256 pseudonym so the auditor can correlate repeat subjects
//! without learning who they are.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt::{self, Write as _};

use crate::domain::foundation::{MatchId, Timestamp, UserId, ValidationError};

use super::result::MatchResult;

type HmacSha256 = Hmac<Sha256>;

/// Derives stable pseudonyms for user ids.
#[derive(Clone)]
pub struct Pseudonymizer {
    mac: HmacSha256,
}

impl Pseudonymizer {
    pub fn new(secret: &Secret<String>) -> Result<Self, ValidationError> {
        let key = secret.expose_secret();
        if key.trim().is_empty() {
            return Err(ValidationError::empty_field("pseudonym_secret"));
        }
        let mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| ValidationError::invalid_format("pseudonym_secret", e.to_string()))?;
        Ok(Self { mac })
    }

    /// Hex-encoded HMAC of the user id.
    pub fn pseudonym(&self, user: &UserId) -> String {
        let mut mac = self.mac.clone();
        mac.update(user.as_str().as_bytes());
        let digest = mac.finalize().into_bytes();

        digest.iter().fold(String::with_capacity(64), |mut out, byte| {
            let _ = write!(out, "{:02x}", byte);
            out
        })
    }
}

impl fmt::Debug for Pseudonymizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pseudonymizer([REDACTED])")
    }
}

/// Pseudonymised summary of a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub match_id: MatchId,
    pub subject_a: String,
    pub subject_b: String,
    pub score: f64,
    /// Labels of the key shared values, in rank order.
    pub categories: Vec<String>,
    pub measure: String,
    pub computed_at: Timestamp,
}

impl AuditRecord {
    pub fn from_result(result: &MatchResult, pseudonymizer: &Pseudonymizer) -> Self {
        Self {
            match_id: result.match_id,
            subject_a: pseudonymizer.pseudonym(&result.user_a),
            subject_b: pseudonymizer.pseudonym(&result.user_b),
            score: result.score.value(),
            categories: result.key_value_labels(),
            measure: result.measure.clone(),
            computed_at: result.computed_at,
        }
    }
}

/// Verdict returned by the Verification System.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditVerdict {
    pub passed: bool,
    #[serde(default)]
    pub reason: String,
}

impl AuditVerdict {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Passed,
    Failed,
    Unavailable,
}

/// What became of one audit submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub match_id: MatchId,
    pub status: AuditStatus,
    pub reason: String,
    pub recorded_at: Timestamp,
}

impl AuditOutcome {
    pub fn from_verdict(match_id: MatchId, verdict: AuditVerdict) -> Self {
        let status = if verdict.passed {
            AuditStatus::Passed
        } else {
            AuditStatus::Failed
        };
        Self {
            match_id,
            status,
            reason: verdict.reason,
            recorded_at: Timestamp::now(),
        }
    }

    pub fn unavailable(match_id: MatchId, reason: impl Into<String>) -> Self {
        Self {
            match_id,
            status: AuditStatus::Unavailable,
            reason: reason.into(),
            recorded_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ethics::EthicalWeightTable;
    use crate::domain::matching::{MatchContext, MatchScorer, SetOverlap};
    use crate::domain::profile::{ValueCategory, ValueMap, ValueStrength};
    use std::sync::Arc;

    fn pseudonymizer(secret: &str) -> Pseudonymizer {
        Pseudonymizer::new(&Secret::new(secret.to_string())).unwrap()
    }

    #[test]
    fn pseudonyms_are_stable_and_keyed() {
        let alice = UserId::new("alice").unwrap();
        let p1 = pseudonymizer("secret-one");
        let p2 = pseudonymizer("secret-two");

        assert_eq!(p1.pseudonym(&alice), p1.pseudonym(&alice));
        assert_ne!(p1.pseudonym(&alice), p2.pseudonym(&alice));
        assert_eq!(p1.pseudonym(&alice).len(), 64);
        assert!(!p1.pseudonym(&alice).contains("alice"));
    }

    #[test]
    fn blank_secret_is_rejected() {
        assert!(Pseudonymizer::new(&Secret::new("  ".to_string())).is_err());
    }

    #[test]
    fn debug_does_not_leak_key() {
        assert_eq!(format!("{:?}", pseudonymizer("hunter2")), "Pseudonymizer([REDACTED])");
    }

    #[test]
    fn record_carries_pseudonyms_and_labels() {
        let table = EthicalWeightTable::from_entries(vec![("Transparency", 0.9)]).unwrap();
        let scorer = MatchScorer::new(Arc::new(table), Arc::new(SetOverlap), 0.0);
        let values: ValueMap = [(ValueCategory::new("Transparency").unwrap(), ValueStrength::FULL)]
            .into_iter()
            .collect();
        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();
        let result = scorer.score(&alice, &values, &bob, &values, &MatchContext::default());
        let p = pseudonymizer("k");

        let record = AuditRecord::from_result(&result, &p);

        assert_eq!(record.match_id, result.match_id);
        assert_eq!(record.subject_a, p.pseudonym(&alice));
        assert_eq!(record.subject_b, p.pseudonym(&bob));
        assert_eq!(record.categories, vec!["Transparency".to_string()]);
        assert_eq!(record.score, 100.0);
        assert_eq!(record.measure, "jaccard");
    }

    #[test]
    fn outcome_status_follows_verdict() {
        let id = MatchId::new();
        assert_eq!(
            AuditOutcome::from_verdict(id, AuditVerdict::pass("ok")).status,
            AuditStatus::Passed
        );
        assert_eq!(
            AuditOutcome::from_verdict(id, AuditVerdict::fail("biased")).status,
            AuditStatus::Failed
        );
        assert_eq!(AuditOutcome::unavailable(id, "timeout").status, AuditStatus::Unavailable);
    }
}
