//! Redis-backed refresh token store
//!
//! One key per identity, `refresh_token:{identity}` under the configured
//! prefix, holding the JSON-encoded record. `SET EX` gives atomic
//! last-write-wins replacement and native expiry.

use async_trait::async_trait;
use chrono::Duration;

use gs_core::domain::entities::RefreshTokenRecord;
use gs_core::errors::DomainError;
use gs_core::repositories::RefreshTokenStore;
use gs_shared::utils::mask_email;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Key namespace for refresh token records
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// [`RefreshTokenStore`] on top of [`RedisClient`]
#[derive(Clone)]
pub struct RedisRefreshTokenStore {
    client: RedisClient,
}

impl RedisRefreshTokenStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, identity: &str) -> String {
        self.client.make_key(&record_key(identity))
    }
}

/// Unprefixed key for an identity's record
pub(crate) fn record_key(identity: &str) -> String {
    format!("{}:{}", REFRESH_TOKEN_KEY, identity)
}

/// Expiry in whole seconds for `SET EX`, never below one
pub(crate) fn expiry_seconds(ttl: Duration) -> u64 {
    let millis = ttl.num_milliseconds().max(0) as u64;
    ((millis + 999) / 1000).max(1)
}

#[async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn save(&self, record: &RefreshTokenRecord, ttl: Duration) -> Result<(), DomainError> {
        let value = serde_json::to_string(record).map_err(InfrastructureError::from)?;

        self.client
            .set_with_expiry(&self.key(&record.identity), &value, expiry_seconds(ttl))
            .await?;

        tracing::debug!(
            identity = %mask_email(&record.identity),
            ttl_secs = ttl.num_seconds(),
            "Stored refresh token record"
        );
        Ok(())
    }

    async fn find(&self, identity: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let Some(value) = self.client.get(&self.key(identity)).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<RefreshTokenRecord>(&value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // Corrupt records are treated as absent
                tracing::warn!(
                    identity = %mask_email(identity),
                    error = %e,
                    "Discarding corrupt refresh token record"
                );
                Ok(None)
            }
        }
    }

    async fn delete(&self, identity: &str) -> Result<(), DomainError> {
        let existed = self.client.delete(&self.key(identity)).await?;
        tracing::debug!(identity = %mask_email(identity), existed, "Deleted refresh token record");
        Ok(())
    }
}
