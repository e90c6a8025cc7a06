//! In-process refresh token store

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenStore;

/// `HashMap`-backed [`RefreshTokenStore`] for tests and single-node development
///
/// Records are never evicted on their own. Readers judge expiry against
/// `expires_at`, and [`purge_expired`](Self::purge_expired) drops stale entries.
#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    records: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every record expired at `now`, returning how many were dropped
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_expired_at(now));
        let purged = before - records.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired refresh tokens");
        }
        purged
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn save(&self, record: &RefreshTokenRecord, _ttl: Duration) -> Result<(), DomainError> {
        self.records
            .write()
            .await
            .insert(record.identity.clone(), record.clone());
        Ok(())
    }

    async fn find(&self, identity: &str) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self.records.read().await.get(identity).cloned())
    }

    async fn delete(&self, identity: &str) -> Result<(), DomainError> {
        self.records.write().await.remove(identity);
        Ok(())
    }
}
