//! Store trait for pending email verification codes.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::DomainError;

/// Storage for verification codes and the "recently verified" flag
///
/// All keys are normalized email addresses. At most one pending code exists
/// per email; saving replaces it.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Insert or replace the pending code for `code.email`, expiring after `ttl`
    async fn save_code(&self, code: &VerificationCode, ttl: Duration) -> Result<(), DomainError>;

    /// Fetch the pending code for `email`
    async fn find_code(&self, email: &str) -> Result<Option<VerificationCode>, DomainError>;

    /// Remove the pending code; missing codes are ignored
    async fn delete_code(&self, email: &str) -> Result<(), DomainError>;

    /// Record that `email` passed verification, valid for `ttl` from `now`
    async fn mark_verified(
        &self,
        email: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(), DomainError>;

    /// Whether `email` passed verification and the flag is still live at `now`
    async fn is_verified(&self, email: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;
}
