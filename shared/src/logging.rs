//! Tracing subscriber initialisation

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, Environment};

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// Subscriber settings, usually the `[logging]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `gs_core=debug,info`
    pub level: String,

    #[serde(default = "default_format")]
    pub format: LogFormat,

    /// Attach file and line to every event
    #[serde(default)]
    pub source_location: bool,
}

impl LoggingConfig {
    /// Defaults per environment: verbose and readable locally, JSON elsewhere
    pub fn for_environment(environment: Environment) -> Self {
        let (level, format) = match environment {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("warn", LogFormat::Json),
        };
        Self {
            level: level.to_string(),
            format,
            source_location: environment == Environment::Development,
        }
    }
}

fn default_format() -> LogFormat {
    LogFormat::Pretty
}

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`. Fails if the
/// filter directive is malformed or a global subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = build_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.format != LogFormat::Json)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| ConfigError::Load(format!("failed to install tracing subscriber: {}", e)))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| ConfigError::InvalidValue {
            key: "logging.level".to_string(),
            message: e.to_string(),
        }),
    }
}
