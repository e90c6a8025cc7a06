//! Store trait for the server-side half of refresh tokens.

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Key-value store mapping an identity to its current refresh token
///
/// Holds at most one record per identity. Implementations must make `save`
/// an atomic last-write-wins upsert so concurrent logins for the same
/// identity leave exactly one record behind.
///
/// Failures to reach the backing store are reported as
/// [`DomainError::StoreUnavailable`].
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Insert or replace the record for `record.identity`
    ///
    /// Stores with native expiry should drop the record after `ttl`.
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use gs_core::domain::entities::RefreshTokenRecord;
    /// # use gs_core::repositories::RefreshTokenStore;
    /// # async fn example(store: &impl RefreshTokenStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let now = Utc::now();
    /// let record = RefreshTokenRecord {
    ///     identity: "alice@example.com".to_string(),
    ///     token: "eyJ...".to_string(),
    ///     issued_at: now,
    ///     expires_at: now + Duration::days(7),
    /// };
    /// store.save(&record, Duration::days(7)).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, record: &RefreshTokenRecord, ttl: Duration) -> Result<(), DomainError>;

    /// Fetch the record for `identity`
    ///
    /// # Returns
    /// * `Ok(Some(record))` - A record exists (it may already be past `expires_at`)
    /// * `Ok(None)` - No active refresh token
    async fn find(&self, identity: &str) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Remove the record for `identity`; deleting a missing record succeeds
    async fn delete(&self, identity: &str) -> Result<(), DomainError>;
}
