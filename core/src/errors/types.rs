//! Error types for token and verification code operations
//!
//! Token failures are deliberately coarse: every way a presented token can
//! be wrong surfaces as [`TokenError::InvalidToken`]. The specific cause is
//! logged where it is detected and never returned.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed, expired, wrong subject or revoked
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Email verification code errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("No verification code was requested for this address")]
    CodeNotFound,

    #[error("Verification code expired")]
    CodeExpired,

    #[error("Invalid verification code ({remaining_attempts} attempts remaining)")]
    InvalidCode { remaining_attempts: u32 },

    #[error("Maximum attempts exceeded. Please request a new code")]
    MaxAttemptsExceeded,

    #[error("Too many requests. Retry in {retry_after_seconds} seconds")]
    TooManyRequests { retry_after_seconds: i64 },

    #[error("Verification email could not be delivered")]
    DeliveryFailed,
}
