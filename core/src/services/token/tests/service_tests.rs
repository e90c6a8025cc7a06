//! Unit tests for token service

use chrono::{DateTime, Duration, TimeZone, Utc};
use gs_shared::config::JwtConfig;

use crate::domain::entities::token::{RefreshTokenRecord, SubjectType};
use crate::errors::DomainError;
use crate::repositories::{InMemoryRefreshTokenStore, RefreshTokenStore};
use crate::services::token::{TokenService, TokenServiceConfig};

use super::mocks::{FailingStore, HangingStore};

const SECRET: &str = "service-test-secret-with-enough-entropy";
const EMAIL: &str = "alice@example.com";

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn config() -> TokenServiceConfig {
    TokenServiceConfig::new(SECRET)
        .with_access_ttl(Duration::minutes(15))
        .with_refresh_ttl(Duration::days(7))
}

fn service() -> TokenService<InMemoryRefreshTokenStore> {
    TokenService::new(InMemoryRefreshTokenStore::new(), config()).unwrap()
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[test]
fn test_new_rejects_unusable_config() {
    let empty_secret = TokenServiceConfig::new("");
    assert!(matches!(
        TokenService::new(InMemoryRefreshTokenStore::new(), empty_secret),
        Err(DomainError::Configuration { .. })
    ));

    let zero_ttl = config().with_access_ttl(Duration::zero());
    assert!(TokenService::new(InMemoryRefreshTokenStore::new(), zero_ttl).is_err());

    let zero_timeout = config().with_store_timeout(std::time::Duration::ZERO);
    assert!(TokenService::new(InMemoryRefreshTokenStore::new(), zero_timeout).is_err());
}

#[test]
fn test_config_from_jwt_config() {
    let mut jwt = JwtConfig::new(SECRET);
    jwt.access_token_expiry = 60;
    jwt.email_claim = "user".to_string();

    let config = TokenServiceConfig::from_jwt_config(&jwt).unwrap();
    assert_eq!(config.access_token_ttl, Duration::seconds(60));
    assert_eq!(config.refresh_token_ttl, Duration::seconds(604_800));
    assert_eq!(config.identity_claim, "user");
    assert_eq!(config.bearer_prefix, "Bearer ");
    assert_eq!(config.access_header, "Authorization");
    assert!(!format!("{:?}", config).contains(SECRET));

    let blank = JwtConfig::new("  ");
    assert!(matches!(
        TokenServiceConfig::from_jwt_config(&blank),
        Err(DomainError::Configuration { .. })
    ));
}

#[test]
fn test_access_token_round_trip() {
    let service = service();
    let issued = service.issue_access_token(EMAIL, now()).unwrap();

    assert_eq!(issued.subject, SubjectType::Access);
    assert_eq!(issued.expires_at, now() + Duration::minutes(15));
    assert_eq!(service.extract_identity(&issued.token, now()).unwrap(), EMAIL);
}

#[tokio::test]
async fn test_access_token_is_not_stored() {
    let service = service();
    service.issue_access_token(EMAIL, now()).unwrap();

    assert!(service.store().is_empty().await);
}

#[test]
fn test_expiry_is_truncated_to_seconds() {
    let service = service();
    let issued_at = now() + Duration::milliseconds(750);
    let issued = service.issue_access_token(EMAIL, issued_at).unwrap();

    assert_eq!(issued.expires_at, now() + Duration::minutes(15));
    assert!(service
        .extract_identity(&issued.token, now() + Duration::minutes(15))
        .is_err());
}

#[test]
fn test_access_token_expiry_boundaries() {
    let service = service();
    let token = service.issue_access_token(EMAIL, now()).unwrap().token;
    let ttl = Duration::minutes(15);

    assert!(service.extract_identity(&token, now() + ttl - Duration::milliseconds(1)).is_ok());
    assert!(service.extract_identity(&token, now() + ttl).unwrap_err().is_invalid_token());
    assert!(service
        .extract_identity(&token, now() + ttl + Duration::milliseconds(1))
        .unwrap_err()
        .is_invalid_token());
}

#[test]
fn test_wrong_secret_rejected() {
    let token = service().issue_access_token(EMAIL, now()).unwrap().token;
    let other = TokenService::new(
        InMemoryRefreshTokenStore::new(),
        TokenServiceConfig::new("another-secret-entirely"),
    )
    .unwrap();

    assert!(other.extract_identity(&token, now()).unwrap_err().is_invalid_token());
}

#[test]
fn test_empty_identity_rejected() {
    let service = service();
    assert!(matches!(
        service.issue_access_token("", now()),
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_refresh_token_not_accepted_as_access_token() {
    let service = service();
    let refresh = service.issue_refresh_token(EMAIL, now()).await.unwrap();

    assert!(service
        .extract_identity(&refresh.token, now())
        .unwrap_err()
        .is_invalid_token());
}

#[tokio::test]
async fn test_access_token_not_accepted_as_refresh_token() {
    let service = service();
    let access = service.issue_access_token(EMAIL, now()).unwrap();

    assert!(service
        .validate_refresh_token(&access.token, now())
        .await
        .unwrap_err()
        .is_invalid_token());
}

#[tokio::test]
async fn test_refresh_token_is_recorded() {
    let service = service();
    let issued = service.issue_refresh_token(EMAIL, now()).await.unwrap();

    let record = service.store().find(EMAIL).await.unwrap().unwrap();
    assert_eq!(record.token, issued.token);
    assert_eq!(record.issued_at, now());
    assert_eq!(record.expires_at, now() + Duration::days(7));
    assert_eq!(
        service.validate_refresh_token(&issued.token, now()).await.unwrap(),
        EMAIL
    );
}

#[tokio::test]
async fn test_reissue_invalidates_previous_refresh_token() {
    let service = service();
    let first = service.issue_refresh_token(EMAIL, now()).await.unwrap();
    let later = now() + Duration::seconds(1);
    let second = service.issue_refresh_token(EMAIL, later).await.unwrap();

    assert_ne!(first.token, second.token);
    assert!(service
        .validate_refresh_token(&first.token, later)
        .await
        .unwrap_err()
        .is_invalid_token());
    assert!(service.validate_refresh_token(&second.token, later).await.is_ok());
}

#[tokio::test]
async fn test_reissue_within_same_second_invalidates_previous() {
    let service = service();
    let first = service.issue_refresh_token(EMAIL, now()).await.unwrap();
    let later = now() + Duration::milliseconds(400);
    let second = service.issue_refresh_token(EMAIL, later).await.unwrap();

    assert_eq!(first.expires_at, second.expires_at);
    assert_ne!(first.token, second.token);
    assert!(service
        .validate_refresh_token(&first.token, later)
        .await
        .unwrap_err()
        .is_invalid_token());
}

#[tokio::test]
async fn test_refresh_token_without_record_rejected() {
    let service = service();
    let issued = service.issue_refresh_token(EMAIL, now()).await.unwrap();
    service.store().delete(EMAIL).await.unwrap();

    assert!(service
        .validate_refresh_token(&issued.token, now())
        .await
        .unwrap_err()
        .is_invalid_token());
}

#[tokio::test]
async fn test_expired_record_rejected() {
    let service = service();
    let issued = service.issue_refresh_token(EMAIL, now()).await.unwrap();
    let shortened = RefreshTokenRecord {
        expires_at: now() + Duration::hours(1),
        ..service.store().find(EMAIL).await.unwrap().unwrap()
    };
    service.store().save(&shortened, Duration::hours(1)).await.unwrap();

    assert!(service
        .validate_refresh_token(&issued.token, now() + Duration::minutes(59))
        .await
        .is_ok());
    assert!(service
        .validate_refresh_token(&issued.token, now() + Duration::hours(1))
        .await
        .unwrap_err()
        .is_invalid_token());
}

#[tokio::test]
async fn test_issue_token_pair() {
    let service = service();
    let pair = service.issue_token_pair(EMAIL, now()).await.unwrap();

    assert_eq!(pair.token_type, "Bearer");
    assert_eq!(pair.access_expires_in, 900);
    assert_eq!(pair.refresh_expires_in, 604_800);
    assert_eq!(service.extract_identity(&pair.access_token, now()).unwrap(), EMAIL);
    assert_eq!(
        service.validate_refresh_token(&pair.refresh_token, now()).await.unwrap(),
        EMAIL
    );
}

#[tokio::test]
async fn test_rotate_revokes_presented_token() {
    let service = service();
    let first_pair = service.issue_token_pair(EMAIL, now()).await.unwrap();
    let later = now() + Duration::minutes(20);

    let rotated = service.rotate(&first_pair.refresh_token, later).await.unwrap();

    assert_ne!(rotated.refresh_token, first_pair.refresh_token);
    assert_eq!(service.extract_identity(&rotated.access_token, later).unwrap(), EMAIL);
    assert!(service
        .rotate(&first_pair.refresh_token, later)
        .await
        .unwrap_err()
        .is_invalid_token());
    assert!(service.rotate(&rotated.refresh_token, later).await.is_ok());
}

#[tokio::test]
async fn test_rotate_within_same_second_revokes_presented_token() {
    let service = service();
    let first_pair = service.issue_token_pair(EMAIL, now()).await.unwrap();
    let later = now() + Duration::milliseconds(400);

    let rotated = service.rotate(&first_pair.refresh_token, later).await.unwrap();

    assert_ne!(rotated.refresh_token, first_pair.refresh_token);
    assert!(service
        .rotate(&first_pair.refresh_token, later)
        .await
        .unwrap_err()
        .is_invalid_token());
    assert!(service
        .validate_refresh_token(&rotated.refresh_token, later)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_revoke() {
    let service = service();
    let issued = service.issue_refresh_token(EMAIL, now()).await.unwrap();

    service.revoke(EMAIL).await.unwrap();
    service.revoke(EMAIL).await.unwrap();

    assert!(service.validate_refresh_token(&issued.token, now()).await.is_err());
}

#[test]
fn test_extract_bearer() {
    let service = service();

    assert_eq!(service.extract_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    assert_eq!(service.extract_bearer(None), None);
    assert_eq!(service.extract_bearer(Some("")), None);
    assert_eq!(service.extract_bearer(Some("Bearer ")), None);
    assert_eq!(service.extract_bearer(Some("Bearer")), None);
    assert_eq!(service.extract_bearer(Some("bearer abc")), None);
    assert_eq!(service.extract_bearer(Some("Basic abc")), None);
    assert_eq!(service.extract_bearer(Some("abc")), None);
}

#[test]
fn test_extract_bearer_custom_prefix() {
    let mut config = config();
    config.bearer_prefix = "Token ".to_string();
    let service = TokenService::new(InMemoryRefreshTokenStore::new(), config).unwrap();

    assert_eq!(service.extract_bearer(Some("Token abc")), Some("abc"));
    assert_eq!(service.extract_bearer(Some("Bearer abc")), None);
}

#[tokio::test]
async fn test_logout_with_access_token_revokes_session() {
    let service = service();
    let pair = service.issue_token_pair(EMAIL, now()).await.unwrap();

    service
        .logout(Some(&bearer(&pair.access_token)), now())
        .await
        .unwrap();

    assert!(service.store().find(EMAIL).await.unwrap().is_none());
    assert!(service
        .validate_refresh_token(&pair.refresh_token, now())
        .await
        .is_err());
}

#[tokio::test]
async fn test_logout_with_refresh_token_revokes_session() {
    let service = service();
    let pair = service.issue_token_pair(EMAIL, now()).await.unwrap();

    service
        .logout(Some(&bearer(&pair.refresh_token)), now())
        .await
        .unwrap();

    assert!(service.store().find(EMAIL).await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_with_superseded_refresh_token_keeps_session() {
    let service = service();
    let superseded = service.issue_refresh_token(EMAIL, now()).await.unwrap();
    let later = now() + Duration::seconds(5);
    let active = service.issue_refresh_token(EMAIL, later).await.unwrap();

    service
        .logout(Some(&bearer(&superseded.token)), later)
        .await
        .unwrap();

    assert_eq!(
        service.validate_refresh_token(&active.token, later).await.unwrap(),
        EMAIL
    );
}

#[tokio::test]
async fn test_logout_with_revoked_refresh_token_keeps_new_session() {
    let service = service();
    let first_pair = service.issue_token_pair(EMAIL, now()).await.unwrap();
    let later = now() + Duration::minutes(1);
    let rotated = service.rotate(&first_pair.refresh_token, later).await.unwrap();

    service
        .logout(Some(&bearer(&first_pair.refresh_token)), later)
        .await
        .unwrap();

    assert!(service.rotate(&rotated.refresh_token, later).await.is_ok());
}

#[tokio::test]
async fn test_logout_without_valid_token_is_noop() {
    let service = service();
    let pair = service.issue_token_pair(EMAIL, now()).await.unwrap();
    let expired_at = now() + Duration::minutes(15);

    service.logout(None, now()).await.unwrap();
    service.logout(Some("Bearer "), now()).await.unwrap();
    service.logout(Some("Bearer not-a-jwt"), now()).await.unwrap();
    service
        .logout(Some(&format!("bearer {}", pair.access_token)), now())
        .await
        .unwrap();
    service
        .logout(Some(&bearer(&pair.access_token)), expired_at)
        .await
        .unwrap();

    assert!(service.store().find(EMAIL).await.unwrap().is_some());
}

#[test]
fn test_oversized_lifetimes_rejected_at_startup() {
    let mut jwt = JwtConfig::new(SECRET);
    jwt.access_token_expiry = 9_000_000_000_000;
    assert!(matches!(
        TokenServiceConfig::from_jwt_config(&jwt),
        Err(DomainError::Configuration { .. })
    ));

    jwt.access_token_expiry = i64::MAX;
    assert!(TokenServiceConfig::from_jwt_config(&jwt).is_err());

    let config = config().with_refresh_ttl(Duration::days(365 * 100));
    assert!(matches!(
        TokenService::new(InMemoryRefreshTokenStore::new(), config),
        Err(DomainError::Configuration { .. })
    ));
}

#[test]
fn test_expiry_overflow_is_an_error() {
    let service = service();
    let far_future = DateTime::<Utc>::MAX_UTC - Duration::minutes(1);

    let err = service.issue_access_token(EMAIL, far_future).unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
}

#[tokio::test]
async fn test_store_failure_surfaces_as_unavailable() {
    let service = TokenService::new(FailingStore, config()).unwrap();
    let access = service.issue_access_token(EMAIL, now()).unwrap();

    let err = service.issue_refresh_token(EMAIL, now()).await.unwrap_err();
    assert!(err.is_retryable());

    let err = service
        .logout(Some(&bearer(&access.token)), now())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_store_times_out() {
    let config = config().with_store_timeout(std::time::Duration::from_millis(50));
    let service = TokenService::new(HangingStore, config).unwrap();
    let access = service.issue_access_token(EMAIL, now()).unwrap();

    let err = service.issue_refresh_token(EMAIL, now()).await.unwrap_err();
    assert!(matches!(err, DomainError::StoreUnavailable { .. }));

    let err = service.revoke(EMAIL).await.unwrap_err();
    assert!(err.is_retryable());

    let err = service
        .logout(Some(&bearer(&access.token)), now())
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}
