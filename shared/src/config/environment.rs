//! Deployment environment detection

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Variables consulted by [`Environment::from_env`], first match wins
const ENV_VARS: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Environment named by the process environment, development if unset
    ///
    /// An unrecognized name is logged and treated as development.
    pub fn from_env() -> Self {
        let Some(name) = ENV_VARS.iter().find_map(|key| std::env::var(key).ok()) else {
            return Environment::Development;
        };

        name.parse().unwrap_or_else(|e: ConfigError| {
            tracing::warn!(error = %e, "Falling back to development environment");
            Environment::Development
        })
    }

    /// Optional TOML file layered under the environment variables
    pub fn config_file(&self) -> String {
        format!("config.{}.toml", self.as_str())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::InvalidValue {
                key: "environment".to_string(),
                message: format!("unknown environment '{}'", other),
            }),
        }
    }
}
