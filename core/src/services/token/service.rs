//! Main token service implementation

use chrono::{DateTime, Duration, TimeZone, Utc};
use constant_time_eq::constant_time_eq;
use std::future::Future;

use crate::domain::entities::token::{IssuedToken, RefreshTokenRecord, SubjectType, TokenPair};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::RefreshTokenStore;
use crate::services::bounded::bounded_call;
use gs_shared::utils::mask_email;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Service issuing, validating and revoking JWTs
///
/// Access tokens are stateless. Refresh tokens are also recorded in the
/// store, one per identity, and can be revoked.
pub struct TokenService<S: RefreshTokenStore> {
    store: S,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<S: RefreshTokenStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// Fails with [`DomainError::Configuration`] when the secret is empty or
    /// any lifetime, prefix or timeout is unusable.
    pub fn new(store: S, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let codec = TokenCodec::new(&config.jwt_secret, config.identity_claim.clone())?;

        tracing::info!(
            access_ttl_secs = config.access_token_ttl.num_seconds(),
            refresh_ttl_secs = config.refresh_token_ttl.num_seconds(),
            identity_claim = %config.identity_claim,
            "Token service initialized"
        );

        Ok(Self {
            store,
            codec,
            config,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Name of the request header [`extract_bearer`](Self::extract_bearer) expects
    pub fn access_header(&self) -> &str {
        &self.config.access_header
    }

    /// Issue a stateless access token valid until `now + access_token_ttl`
    pub fn issue_access_token(&self, identity: &str, now: DateTime<Utc>) -> DomainResult<IssuedToken> {
        self.issue(SubjectType::Access, identity, self.config.access_token_ttl, now)
    }

    /// Issue a refresh token and record it as the identity's only active one
    pub async fn issue_refresh_token(
        &self,
        identity: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<IssuedToken> {
        let issued = self.issue(SubjectType::Refresh, identity, self.config.refresh_token_ttl, now)?;
        let record = RefreshTokenRecord::from_issued(&issued, now);
        let ttl = issued.expires_at - now;

        self.bounded("save", self.store.save(&record, ttl)).await?;

        tracing::info!(
            identity = %mask_email(identity),
            event = "refresh_token_issued",
            expires_at = %issued.expires_at,
            "Refresh token issued"
        );
        Ok(issued)
    }

    /// Issue an access token and a refresh token for `identity`
    pub async fn issue_token_pair(&self, identity: &str, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        let access = self.issue_access_token(identity, now)?;
        let refresh = self.issue_refresh_token(identity, now).await?;
        Ok(TokenPair::from_issued(&access, &refresh, now))
    }

    /// Strip the configured scheme prefix from an Authorization header value
    ///
    /// The match is case-sensitive and includes the separating space. An
    /// absent header, a different scheme or an empty remainder yields `None`.
    pub fn extract_bearer<'a>(&self, header: Option<&'a str>) -> Option<&'a str> {
        header?
            .strip_prefix(self.config.bearer_prefix.as_str())
            .filter(|token| !token.is_empty())
    }

    /// Identity carried by a valid, unexpired access token
    pub fn extract_identity(&self, token: &str, now: DateTime<Utc>) -> DomainResult<String> {
        let verified = self.codec.verify(token, now)?;
        if verified.subject != SubjectType::Access {
            tracing::debug!(
                event = "token_rejected",
                subject = %verified.subject,
                "Expected an access token"
            );
            return Err(DomainError::invalid_token());
        }
        Ok(verified.identity)
    }

    /// Identity carried by a refresh token that is still the active one in the store
    pub async fn validate_refresh_token(&self, token: &str, now: DateTime<Utc>) -> DomainResult<String> {
        let verified = self.codec.verify(token, now)?;
        if verified.subject != SubjectType::Refresh {
            tracing::debug!(
                event = "token_rejected",
                subject = %verified.subject,
                "Expected a refresh token"
            );
            return Err(DomainError::invalid_token());
        }

        let record = self
            .bounded("find", self.store.find(&verified.identity))
            .await?;
        let masked = mask_email(&verified.identity);

        match record {
            None => {
                tracing::warn!(identity = %masked, event = "token_rejected", "Refresh token not on record");
                Err(DomainError::invalid_token())
            }
            Some(record) if record.is_expired_at(now) => {
                tracing::debug!(identity = %masked, event = "token_rejected", "Refresh record expired");
                Err(DomainError::invalid_token())
            }
            Some(record) if !constant_time_eq(record.token.as_bytes(), token.as_bytes()) => {
                tracing::warn!(
                    identity = %masked,
                    event = "token_rejected",
                    "Refresh token superseded or revoked"
                );
                Err(DomainError::invalid_token())
            }
            Some(_) => Ok(verified.identity),
        }
    }

    /// Exchange a valid refresh token for a new pair; the presented token stops working
    pub async fn rotate(&self, refresh_token: &str, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        let identity = self.validate_refresh_token(refresh_token, now).await?;
        let pair = self.issue_token_pair(&identity, now).await?;

        tracing::info!(identity = %mask_email(&identity), event = "token_rotated", "Token pair rotated");
        Ok(pair)
    }

    /// Drop the identity's refresh token; a missing record is not an error
    pub async fn revoke(&self, identity: &str) -> DomainResult<()> {
        self.bounded("delete", self.store.delete(identity)).await?;
        tracing::info!(identity = %mask_email(identity), event = "refresh_token_revoked", "Refresh token revoked");
        Ok(())
    }

    /// Revoke the refresh token of whoever presented `header`
    ///
    /// Either token type identifies the session; a refresh token must still
    /// be the active one. A missing header, foreign scheme, invalid or
    /// superseded token is a successful no-op; store failures are not.
    pub async fn logout(&self, header: Option<&str>, now: DateTime<Utc>) -> DomainResult<()> {
        let Some(token) = self.extract_bearer(header) else {
            tracing::debug!(event = "logout_ignored", "Logout without bearer token");
            return Ok(());
        };

        let identity = match self.codec.verify(token, now) {
            Ok(verified) if verified.subject == SubjectType::Refresh => {
                match self.validate_refresh_token(token, now).await {
                    Ok(identity) => identity,
                    Err(e) if e.is_invalid_token() => {
                        tracing::debug!(event = "logout_ignored", "Logout with inactive refresh token");
                        return Ok(());
                    }
                    Err(e) => return Err(e),
                }
            }
            Ok(verified) => verified.identity,
            Err(_) => {
                tracing::debug!(event = "logout_ignored", "Logout with invalid token");
                return Ok(());
            }
        };

        self.revoke(&identity).await
    }

    fn issue(
        &self,
        subject: SubjectType,
        identity: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> DomainResult<IssuedToken> {
        if identity.is_empty() {
            return Err(DomainError::Validation {
                message: "identity must not be empty".to_string(),
            });
        }

        // Truncate to what the `exp` claim can carry
        let expires_at = now
            .checked_add_signed(ttl)
            .and_then(|at| Utc.timestamp_opt(at.timestamp(), 0).single())
            .ok_or_else(|| DomainError::Internal {
                message: "token expiry out of range".to_string(),
            })?;
        let token = self.codec.sign(subject, identity, expires_at)?;

        tracing::debug!(identity = %mask_email(identity), subject = %subject, "Token signed");

        Ok(IssuedToken {
            token,
            subject,
            identity: identity.to_string(),
            expires_at,
        })
    }

    /// Run a store call under the configured timeout
    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        bounded_call("refresh token", operation, self.config.store_timeout, call).await
    }
}
