//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing and token lifetime configuration
//! - `cache` - Redis configuration for the token and code stores
//! - `environment` - Deployment environment detection
//! - `verification` - Email verification code policy
//!
//! [`AppConfig::load`] layers an optional `config.<environment>.toml` file
//! under `GRAMSTACK_`-prefixed environment variables, e.g.
//! `GRAMSTACK_JWT__SECRET` sets `jwt.secret`.

pub mod auth;
pub mod cache;
pub mod environment;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{JwtConfig, MAX_TOKEN_EXPIRY_SECONDS};
pub use cache::CacheConfig;
pub use environment::Environment;
pub use crate::logging::{LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Prefix for environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "GRAMSTACK";

/// Configuration errors. Always fatal at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration value: {key}")]
    MissingValue { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound(key) => ConfigError::MissingValue { key },
            other => {
                let message = other.to_string();
                // serde reports absent struct fields as "missing field `name`"
                match message
                    .split("missing field `")
                    .nth(1)
                    .and_then(|rest| rest.split('`').next())
                {
                    Some(field) => ConfigError::MissingValue {
                        key: field.to_string(),
                    },
                    None => ConfigError::Load(message),
                }
            }
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// JWT configuration (the secret has no default)
    pub jwt: JwtConfig,

    /// Redis configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Verification code policy
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration; falls back to the environment's defaults
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

impl AppConfig {
    /// Load configuration from `.env`, the environment's config file and
    /// `GRAMSTACK_*` variables, in increasing order of precedence.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let environment = Environment::from_env();
        Self::load_from(&environment.config_file(), environment)
    }

    /// Load configuration from an explicit file path (optional) plus the
    /// `GRAMSTACK_*` environment variables
    pub fn load_from(path: &str, environment: Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("environment", environment.to_string())?
            .add_source(config::File::new(path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;

        tracing::debug!(
            environment = %app_config.environment,
            config_file = path,
            "Configuration loaded"
        );

        Ok(app_config)
    }

    /// Effective logging configuration
    pub fn logging_config(&self) -> LoggingConfig {
        self.logging
            .clone()
            .unwrap_or_else(|| LoggingConfig::for_environment(self.environment))
    }

    /// Validate every sub-configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.cache.validate()?;
        self.verification.validate()?;
        Ok(())
    }
}
