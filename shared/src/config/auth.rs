//! Authentication configuration: JWT signing secret, token lifetimes and
//! bearer header conventions

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// JWT authentication configuration
///
/// The signing secret has no default; every other field does.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used for signing tokens
    pub secret: String,

    /// Access token expiry time in seconds
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,

    /// Scheme prefix stripped from the Authorization header (case-sensitive)
    #[serde(default = "default_bearer_prefix")]
    pub bearer_prefix: String,

    /// Name of the claim carrying the identity
    #[serde(default = "default_email_claim")]
    pub email_claim: String,

    /// Header that carries the bearer token
    #[serde(default = "default_access_header")]
    pub access_header: String,

    /// Upper bound for a single refresh token store call, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with secret and default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            bearer_prefix: default_bearer_prefix(),
            email_claim: default_email_claim(),
            access_header: default_access_header(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }

    /// Create from environment variables
    ///
    /// `JWT_SECRET` is required; lifetimes fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingValue {
            key: "JWT_SECRET".to_string(),
        })?;

        let mut config = Self::new(secret);
        if let Some(expiry) = parse_env("JWT_ACCESS_TOKEN_EXPIRY")? {
            config.access_token_expiry = expiry;
        }
        if let Some(expiry) = parse_env("JWT_REFRESH_TOKEN_EXPIRY")? {
            config.refresh_token_expiry = expiry;
        }
        if let Ok(prefix) = std::env::var("JWT_BEARER_PREFIX") {
            config.bearer_prefix = prefix;
        }
        if let Ok(claim) = std::env::var("JWT_EMAIL_CLAIM") {
            config.email_claim = claim;
        }
        if let Some(timeout) = parse_env("JWT_STORE_TIMEOUT_MS")? {
            config.store_timeout_ms = timeout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes.saturating_mul(60);
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days.saturating_mul(86400);
        self
    }

    /// Check the configuration can be used to sign tokens
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "jwt.secret".to_string(),
            });
        }
        for (key, expiry) in [
            ("jwt.access_token_expiry", self.access_token_expiry),
            ("jwt.refresh_token_expiry", self.refresh_token_expiry),
        ] {
            if !(1..=MAX_TOKEN_EXPIRY_SECONDS).contains(&expiry) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between 1 and {} seconds", MAX_TOKEN_EXPIRY_SECONDS),
                });
            }
        }
        if self.bearer_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "jwt.bearer_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.email_claim.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "jwt.email_claim".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if matches!(self.email_claim.as_str(), "sub" | "exp" | "jti") {
            return Err(ConfigError::InvalidValue {
                key: "jwt.email_claim".to_string(),
                message: format!("'{}' is a reserved claim", self.email_claim),
            });
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "jwt.store_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{}' is not a valid number", raw),
            }),
        Err(_) => Ok(None),
    }
}

/// Longest accepted token lifetime, ten years
pub const MAX_TOKEN_EXPIRY_SECONDS: i64 = 10 * 365 * 86400;

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604800 // 7 days
}

fn default_bearer_prefix() -> String {
    String::from("Bearer ")
}

fn default_email_claim() -> String {
    String::from("email")
}

fn default_access_header() -> String {
    String::from("Authorization")
}

fn default_store_timeout_ms() -> u64 {
    2000
}
