//! Configuration for the verification service

use chrono::Duration;
use gs_shared::config::VerificationConfig;

use crate::domain::entities::verification_code::CODE_LENGTH;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of digits in a code
    pub code_length: usize,
    /// Lifetime of a code
    pub code_ttl: Duration,
    /// Failed attempts allowed before the code locks
    pub max_attempts: u32,
    /// Minimum time between two codes for the same address
    pub resend_cooldown: Duration,
    /// How long a successful verification is remembered
    pub verified_ttl: Duration,
    /// Upper bound for every code store call
    pub store_timeout: std::time::Duration,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_length: CODE_LENGTH,
            code_ttl: Duration::minutes(5),
            max_attempts: 3,
            resend_cooldown: Duration::seconds(60),
            verified_ttl: Duration::minutes(30),
            store_timeout: std::time::Duration::from_secs(2),
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_length: config.code_length,
            code_ttl: Duration::seconds(config.code_ttl_seconds),
            max_attempts: config.max_attempts,
            resend_cooldown: Duration::seconds(config.resend_cooldown_seconds),
            verified_ttl: Duration::seconds(config.verified_ttl_seconds),
            store_timeout: std::time::Duration::from_millis(config.store_timeout_ms),
        }
    }
}
