//! Timeout guard shared by every store-backed service

use std::future::Future;
use std::time::Duration;

use crate::errors::{DomainError, DomainResult};

/// Await a store call for at most `timeout`
///
/// Elapsed calls become [`DomainError::StoreUnavailable`]; errors from the
/// store itself pass through unchanged.
pub(crate) async fn bounded_call<T, F>(
    store: &'static str,
    operation: &'static str,
    timeout: Duration,
    call: F,
) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!(store, operation, error = %e, "Store call failed");
            Err(e)
        }
        Err(_) => {
            tracing::error!(
                store,
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "Store call timed out"
            );
            Err(DomainError::StoreUnavailable {
                message: format!("{} store {} timed out", store, operation),
            })
        }
    }
}
