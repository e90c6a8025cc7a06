//! Integration tests for the Redis client and stores
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p gs_infra --test redis_integration -- --ignored

use chrono::{Duration, Utc};

use gs_core::domain::entities::{RefreshTokenRecord, VerificationCode};
use gs_core::repositories::{RefreshTokenStore, VerificationCodeStore};
use gs_core::services::{TokenService, TokenServiceConfig};
use gs_infra::cache::{CacheConfig, RedisClient, RedisRefreshTokenStore, RedisVerificationCodeStore};

fn test_config() -> CacheConfig {
    CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("gs_test_{}", std::process::id()))
}

async fn client() -> RedisClient {
    RedisClient::new(test_config())
        .await
        .expect("Failed to connect to Redis")
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let client = client().await;
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_basic_operations() {
    let client = client().await;
    let key = client.make_key("basic");

    client.set_with_expiry(&key, "value", 60).await.unwrap();
    assert_eq!(client.get(&key).await.unwrap(), Some("value".to_string()));
    assert!(client.exists(&key).await.unwrap());

    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 60);

    assert!(client.delete(&key).await.unwrap());
    assert!(!client.delete(&key).await.unwrap());
    assert_eq!(client.get(&key).await.unwrap(), None);
    assert_eq!(client.ttl(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_refresh_token_store_round_trip() {
    let client = client().await;
    let store = RedisRefreshTokenStore::new(client.clone());
    let now = Utc::now();
    let identity = "store@example.com";

    let record = RefreshTokenRecord {
        identity: identity.to_string(),
        token: "token-1".to_string(),
        issued_at: now,
        expires_at: now + Duration::minutes(10),
    };
    store.save(&record, Duration::minutes(10)).await.unwrap();
    assert_eq!(store.find(identity).await.unwrap(), Some(record.clone()));

    let key = client.make_key(&format!("refresh_token:{}", identity));
    let ttl = client.ttl(&key).await.unwrap().unwrap();
    assert!(ttl > 590 && ttl <= 600);

    let replacement = RefreshTokenRecord {
        token: "token-2".to_string(),
        ..record
    };
    store.save(&replacement, Duration::minutes(10)).await.unwrap();
    assert_eq!(store.find(identity).await.unwrap().unwrap().token, "token-2");

    store.delete(identity).await.unwrap();
    store.delete(identity).await.unwrap();
    assert_eq!(store.find(identity).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_token_service_over_redis() {
    let store = RedisRefreshTokenStore::new(client().await);
    let service = TokenService::new(store, TokenServiceConfig::new("integration-secret")).unwrap();
    let now = Utc::now();
    let identity = "flow@example.com";

    let pair = service.issue_token_pair(identity, now).await.unwrap();
    let rotated = service.rotate(&pair.refresh_token, now + Duration::seconds(1)).await.unwrap();

    assert!(service
        .validate_refresh_token(&pair.refresh_token, now + Duration::seconds(1))
        .await
        .is_err());

    let header = format!("Bearer {}", rotated.access_token);
    service.logout(Some(&header), now + Duration::seconds(1)).await.unwrap();
    assert!(service.store().find(identity).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_verification_code_store() {
    let store = RedisVerificationCodeStore::new(client().await);
    let now = Utc::now();
    let email = "verify@example.com";

    let code = VerificationCode::generate(email.to_string(), 6, now, Duration::minutes(5));
    store.save_code(&code, Duration::minutes(5)).await.unwrap();
    assert_eq!(store.find_code(email).await.unwrap(), Some(code));

    store.delete_code(email).await.unwrap();
    assert_eq!(store.find_code(email).await.unwrap(), None);

    assert!(!store.is_verified(email, now).await.unwrap());
    store.mark_verified(email, now, Duration::minutes(1)).await.unwrap();
    assert!(store.is_verified(email, now).await.unwrap());
}
