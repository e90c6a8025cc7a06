//! Redis-backed verification code store
//!
//! Key layout (under the configured prefix):
//! - `verification:code:{email}` - JSON-encoded pending code
//! - `verification:verified:{email}` - marker set after a successful check

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use gs_core::domain::entities::VerificationCode;
use gs_core::errors::DomainError;
use gs_core::repositories::VerificationCodeStore;

use super::redis_client::RedisClient;
use super::refresh_token_store::expiry_seconds;
use crate::InfrastructureError;

const CODE_KEY: &str = "verification:code";
const VERIFIED_KEY: &str = "verification:verified";

/// [`VerificationCodeStore`] on top of [`RedisClient`]
#[derive(Clone)]
pub struct RedisVerificationCodeStore {
    client: RedisClient,
}

impl RedisVerificationCodeStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn code_key(&self, email: &str) -> String {
        self.client.make_key(&code_key(email))
    }

    fn verified_key(&self, email: &str) -> String {
        self.client.make_key(&verified_key(email))
    }
}

pub(crate) fn code_key(email: &str) -> String {
    format!("{}:{}", CODE_KEY, email)
}

pub(crate) fn verified_key(email: &str) -> String {
    format!("{}:{}", VERIFIED_KEY, email)
}

#[async_trait]
impl VerificationCodeStore for RedisVerificationCodeStore {
    async fn save_code(&self, code: &VerificationCode, ttl: Duration) -> Result<(), DomainError> {
        let value = serde_json::to_string(code).map_err(InfrastructureError::from)?;
        self.client
            .set_with_expiry(&self.code_key(&code.email), &value, expiry_seconds(ttl))
            .await?;
        Ok(())
    }

    async fn find_code(&self, email: &str) -> Result<Option<VerificationCode>, DomainError> {
        match self.client.get(&self.code_key(email)).await? {
            Some(value) => Ok(Some(
                serde_json::from_str(&value).map_err(InfrastructureError::from)?,
            )),
            None => Ok(None),
        }
    }

    async fn delete_code(&self, email: &str) -> Result<(), DomainError> {
        self.client.delete(&self.code_key(email)).await?;
        Ok(())
    }

    async fn mark_verified(
        &self,
        email: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        let until = (now + ttl).to_rfc3339();
        self.client
            .set_with_expiry(&self.verified_key(email), &until, expiry_seconds(ttl))
            .await?;
        Ok(())
    }

    async fn is_verified(&self, email: &str, _now: DateTime<Utc>) -> Result<bool, DomainError> {
        Ok(self.client.exists(&self.verified_key(email)).await?)
    }
}
