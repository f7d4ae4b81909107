//! HTTP adapter for the external Verification System.
//!
//! POSTs each pseudonymised audit record as JSON to the configured
//! endpoint and expects an `AuditVerdict` back.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::matching::{AuditRecord, AuditVerdict};
use crate::ports::VerificationSystem;

/// Configuration for the HTTP verification client.
#[derive(Debug, Clone)]
pub struct HttpVerificationConfig {
    /// Full URL records are POSTed to.
    pub endpoint: String,
    /// Bearer token, if the auditor requires one.
    api_key: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpVerificationConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct HttpVerificationSystem {
    config: HttpVerificationConfig,
    client: Client,
}

impl HttpVerificationSystem {
    pub fn new(config: HttpVerificationConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { config, client })
    }

    fn unavailable(&self, message: impl Into<String>) -> DomainError {
        DomainError::new(ErrorCode::VerificationUnavailable, message)
            .with_detail("endpoint", self.config.endpoint.clone())
    }
}

#[async_trait]
impl VerificationSystem for HttpVerificationSystem {
    async fn review(&self, record: &AuditRecord) -> Result<AuditVerdict, DomainError> {
        let mut request = self.client.post(&self.config.endpoint).json(record);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                self.unavailable(format!(
                    "Verification timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else if e.is_connect() {
                self.unavailable(format!("Connection failed: {}", e))
            } else {
                self.unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.unavailable(format!("Verifier returned {}: {}", status, body)));
        }

        response
            .json::<AuditVerdict>()
            .await
            .map_err(|e| self.unavailable(format!("Malformed verdict: {}", e)))
    }
}
