//! In-process verification code store

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::DomainError;

use super::r#trait::VerificationCodeStore;

#[derive(Debug, Default)]
pub struct InMemoryVerificationCodeStore {
    codes: RwLock<HashMap<String, VerificationCode>>,
    verified_until: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryVerificationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VerificationCodeStore for InMemoryVerificationCodeStore {
    async fn save_code(&self, code: &VerificationCode, _ttl: Duration) -> Result<(), DomainError> {
        self.codes
            .write()
            .await
            .insert(code.email.clone(), code.clone());
        Ok(())
    }

    async fn find_code(&self, email: &str) -> Result<Option<VerificationCode>, DomainError> {
        Ok(self.codes.read().await.get(email).cloned())
    }

    async fn delete_code(&self, email: &str) -> Result<(), DomainError> {
        self.codes.write().await.remove(email);
        Ok(())
    }

    async fn mark_verified(
        &self,
        email: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(), DomainError> {
        self.verified_until
            .write()
            .await
            .insert(email.to_string(), now + ttl);
        Ok(())
    }

    async fn is_verified(&self, email: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        Ok(self
            .verified_until
            .read()
            .await
            .get(email)
            .map_or(false, |until| now < *until))
    }
}
