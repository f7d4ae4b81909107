//! External verification (audit) configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationConfig {
    /// Send audit records to the external Verification System.
    #[serde(default)]
    pub enabled: bool,

    /// Endpoint audit records are POSTed to.
    pub endpoint: Option<String>,

    /// Bearer token for the endpoint.
    pub api_key: Option<Secret<String>>,

    /// Key for HMAC pseudonyms in audit records.
    pub pseudonym_secret: Option<Secret<String>>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bounded audit queue; records beyond it are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Number of audit outcomes kept for lookup.
    #[serde(default = "default_verdict_log_capacity")]
    pub verdict_log_capacity: usize,
}

impl VerificationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }

        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ValidationError::MissingRequired("VERIFICATION__ENDPOINT"))?;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ValidationError::InvalidVerificationEndpoint);
        }

        let has_secret = self
            .pseudonym_secret
            .as_ref()
            .is_some_and(|s| !s.expose_secret().trim().is_empty());
        if !has_secret {
            return Err(ValidationError::MissingRequired("VERIFICATION__PSEUDONYM_SECRET"));
        }

        if self.queue_capacity == 0 {
            return Err(ValidationError::OutOfRange {
                field: "verification.queue_capacity",
                range: "1..",
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            pseudonym_secret: None,
            timeout_secs: default_timeout(),
            queue_capacity: default_queue_capacity(),
            verdict_log_capacity: default_verdict_log_capacity(),
        }
    }
}

fn default_timeout() -> u64 {
    5
}

fn default_queue_capacity() -> usize {
    256
}

fn default_verdict_log_capacity() -> usize {
    10_000
}
