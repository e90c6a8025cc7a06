//! Domain-specific error types and error handling.

mod types;


pub use types::{TokenError, VerificationError};

use gs_shared::config::ConfigError;
use gs_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Backing store timed out or is unreachable; safe to retry
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Missing or unusable configuration; raised at startup only
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Whether the caller may retry the same operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::StoreUnavailable { .. })
    }

    /// Shorthand for the single externally visible token failure
    pub fn invalid_token() -> Self {
        DomainError::Token(TokenError::InvalidToken)
    }

    pub fn is_invalid_token(&self) -> bool {
        matches!(self, DomainError::Token(TokenError::InvalidToken))
    }
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        DomainError::Configuration {
            message: err.to_string(),
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::StoreUnavailable { .. } => ErrorResponse::new(
                error_codes::STORE_UNAVAILABLE,
                "Service temporarily unavailable, please retry",
            )
            .add_detail("retryable", true),
            DomainError::Configuration { .. } => ErrorResponse::new(
                error_codes::CONFIGURATION_ERROR,
                "Service is misconfigured",
            ),
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
            DomainError::Token(TokenError::InvalidToken) => {
                ErrorResponse::new(error_codes::TOKEN_INVALID, "Invalid or expired token")
            }
            DomainError::Token(TokenError::TokenGenerationFailed) => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
            DomainError::Verification(err) => verification_response(err),
        }
    }

    fn status_code(&self) -> u16 {
        match self {
            DomainError::Validation { .. } => 400,
            DomainError::StoreUnavailable { .. } => 503,
            DomainError::Token(TokenError::InvalidToken) => 401,
            DomainError::Verification(err) => match err {
                VerificationError::InvalidEmail
                | VerificationError::CodeNotFound
                | VerificationError::InvalidCode { .. } => 400,
                VerificationError::CodeExpired => 410,
                VerificationError::MaxAttemptsExceeded
                | VerificationError::TooManyRequests { .. } => 429,
                VerificationError::DeliveryFailed => 502,
            },
            DomainError::Configuration { .. }
            | DomainError::Internal { .. }
            | DomainError::Token(TokenError::TokenGenerationFailed) => 500,
        }
    }
}

fn verification_response(err: &VerificationError) -> ErrorResponse {
    let message = err.to_string();
    match err {
        VerificationError::InvalidEmail => ErrorResponse::new(error_codes::EMAIL_INVALID, message),
        VerificationError::CodeNotFound => {
            ErrorResponse::new(error_codes::VERIFICATION_CODE_NOT_FOUND, message)
        }
        VerificationError::CodeExpired => {
            ErrorResponse::new(error_codes::VERIFICATION_CODE_EXPIRED, message)
        }
        VerificationError::InvalidCode { remaining_attempts } => {
            ErrorResponse::new(error_codes::VERIFICATION_CODE_INVALID, message)
                .add_detail("remaining_attempts", remaining_attempts)
        }
        VerificationError::MaxAttemptsExceeded => {
            ErrorResponse::new(error_codes::VERIFICATION_ATTEMPTS_EXCEEDED, message)
        }
        VerificationError::TooManyRequests {
            retry_after_seconds,
        } => ErrorResponse::new(error_codes::RATE_LIMIT_EXCEEDED, message)
            .add_detail("retry_after_seconds", retry_after_seconds),
        VerificationError::DeliveryFailed => {
            ErrorResponse::new(error_codes::EMAIL_DELIVERY_FAILED, message)
        }
    }
}
