//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file in
//! development) with the `THINKALIKE` prefix. Nested values are separated
//! by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use thinkalike::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! let weights = config.matching.load_weight_table().expect("Invalid weights");
//! ```

mod database;
mod error;
mod features;
mod matching;
mod server;
mod verification;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use matching::MatchingConfig;
pub use server::{Environment, ServerConfig};
pub use verification::VerificationConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL profile store. Profiles are kept in memory when absent.
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub verification: VerificationConfig,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `THINKALIKE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `THINKALIKE__MATCHING__WEIGHTS_PATH=weights.yaml`
    /// - `THINKALIKE__MATCHING__WEIGHTS__TRANSPARENCY=0.9` (names arrive lowercased)
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("THINKALIKE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// The weight table is checked separately by
    /// [`MatchingConfig::load_weight_table`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.matching.validate()?;
        self.verification.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
