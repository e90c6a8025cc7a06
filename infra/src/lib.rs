//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators `gs_core` depends on:
//!
//! - **Cache**: Redis client, Redis-backed refresh token and verification
//!   code stores
//! - **Mail**: log-only mail sender for development

use gs_core::errors::DomainError;

/// Cache module - Redis client and stores
pub mod cache;

/// Mail module - verification mail delivery
pub mod mail;

pub use cache::{RedisClient, RedisRefreshTokenStore, RedisVerificationCodeStore};
pub use mail::LogMailSender;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(e) => DomainError::StoreUnavailable {
                message: e.to_string(),
            },
            InfrastructureError::Config(message) => DomainError::Configuration { message },
            InfrastructureError::Serialization(e) => DomainError::Internal {
                message: e.to_string(),
            },
        }
    }
}
