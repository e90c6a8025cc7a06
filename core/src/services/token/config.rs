//! Configuration for the token service

use chrono::Duration;
use gs_shared::config::{JwtConfig, MAX_TOKEN_EXPIRY_SECONDS};

use crate::errors::DomainError;

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC-SHA512 signing secret
    pub jwt_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Header carrying the bearer token, e.g. `Authorization`
    pub access_header: String,
    /// Scheme prefix expected in that header, e.g. `"Bearer "`
    pub bearer_prefix: String,
    /// Claim name carrying the identity
    pub identity_claim: String,
    /// Upper bound for every refresh token store call
    pub store_timeout: std::time::Duration,
}

impl TokenServiceConfig {
    /// Config with the given secret and default lifetimes
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self::from_parts(&JwtConfig::new(jwt_secret))
    }

    /// Build from the loaded application config, validating it first
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            access_token_ttl: lifetime(config.access_token_expiry),
            refresh_token_ttl: lifetime(config.refresh_token_expiry),
            access_header: config.access_header.clone(),
            bearer_prefix: config.bearer_prefix.clone(),
            identity_claim: config.email_claim.clone(),
            store_timeout: std::time::Duration::from_millis(config.store_timeout_ms),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }

    pub fn with_store_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), DomainError> {
        let invalid = |message: &str| DomainError::Configuration {
            message: message.to_string(),
        };

        if self.jwt_secret.trim().is_empty() {
            return Err(invalid("JWT secret must not be empty"));
        }
        let max_ttl = Duration::seconds(MAX_TOKEN_EXPIRY_SECONDS);
        for ttl in [self.access_token_ttl, self.refresh_token_ttl] {
            if ttl <= Duration::zero() || ttl > max_ttl {
                return Err(invalid("token lifetimes must be positive and at most ten years"));
            }
        }
        if self.bearer_prefix.is_empty() {
            return Err(invalid("bearer prefix must not be empty"));
        }
        if self.identity_claim.is_empty() || matches!(self.identity_claim.as_str(), "sub" | "exp" | "jti") {
            return Err(invalid("identity claim must be a non-reserved claim name"));
        }
        if self.store_timeout.is_zero() {
            return Err(invalid("store timeout must be positive"));
        }
        Ok(())
    }
}

/// Seconds as a lifetime; out-of-range values become zero and fail validation
fn lifetime(seconds: i64) -> Duration {
    Duration::try_seconds(seconds).unwrap_or_else(Duration::zero)
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("access_header", &self.access_header)
            .field("bearer_prefix", &self.bearer_prefix)
            .field("identity_claim", &self.identity_claim)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}
