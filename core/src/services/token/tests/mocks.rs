//! Store doubles for failure-path tests

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;
use crate::repositories::RefreshTokenStore;

/// Store whose calls never complete
pub struct HangingStore;

#[async_trait]
impl RefreshTokenStore for HangingStore {
    async fn save(&self, _record: &RefreshTokenRecord, _ttl: Duration) -> Result<(), DomainError> {
        std::future::pending().await
    }

    async fn find(&self, _identity: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        std::future::pending().await
    }

    async fn delete(&self, _identity: &str) -> Result<(), DomainError> {
        std::future::pending().await
    }
}

/// Store that is reachable but always refuses
pub struct FailingStore;

fn unavailable() -> DomainError {
    DomainError::StoreUnavailable {
        message: "connection refused".to_string(),
    }
}

#[async_trait]
impl RefreshTokenStore for FailingStore {
    async fn save(&self, _record: &RefreshTokenRecord, _ttl: Duration) -> Result<(), DomainError> {
        Err(unavailable())
    }

    async fn find(&self, _identity: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Err(unavailable())
    }

    async fn delete(&self, _identity: &str) -> Result<(), DomainError> {
        Err(unavailable())
    }
}
