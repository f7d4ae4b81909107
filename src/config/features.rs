//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Show internal error messages in HTTP responses (disable in production!)
    #[serde(default)]
    pub verbose_errors: bool,

    /// Enable HTTP request tracing
    #[serde(default = "default_true")]
    pub enable_tracing: bool,

    /// Run in-process fairness checks on every match
    #[serde(default = "default_true")]
    pub enable_fairness_checks: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            verbose_errors: false,
            enable_tracing: true,
            enable_fairness_checks: true,
        }
    }
}

fn default_true() -> bool {
    true
}
