//! Email verification code policy

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Verification code configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of digits in a code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds before a sent code expires
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: i64,

    /// Wrong guesses allowed per code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum seconds between two codes for the same address
    #[serde(default = "default_resend_cooldown")]
    pub resend_cooldown_seconds: i64,

    /// Seconds an address stays verified after a successful check
    #[serde(default = "default_verified_ttl")]
    pub verified_ttl_seconds: i64,

    /// Upper bound for every code store call, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            code_ttl_seconds: default_code_ttl(),
            max_attempts: default_max_attempts(),
            resend_cooldown_seconds: default_resend_cooldown(),
            verified_ttl_seconds: default_verified_ttl(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl VerificationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=10).contains(&self.code_length) {
            return Err(ConfigError::InvalidValue {
                key: "verification.code_length".to_string(),
                message: "must be between 4 and 10 digits".to_string(),
            });
        }
        if self.code_ttl_seconds <= 0 || self.verified_ttl_seconds <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "verification.code_ttl_seconds".to_string(),
                message: "lifetimes must be positive".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "verification.max_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.resend_cooldown_seconds < 0 {
            return Err(ConfigError::InvalidValue {
                key: "verification.resend_cooldown_seconds".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "verification.store_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_code_length() -> usize {
    6
}

fn default_code_ttl() -> i64 {
    300 // 5 minutes
}

fn default_max_attempts() -> u32 {
    3
}

fn default_resend_cooldown() -> i64 {
    60
}

fn default_verified_ttl() -> i64 {
    1800 // 30 minutes
}

fn default_store_timeout_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_config_default() {
        let config = VerificationConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_ttl_seconds, 300);
        assert_eq!(config.max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let config = VerificationConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_store_timeout_rejected() {
        let config = VerificationConfig {
            store_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
