//! Main authentication service implementation

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::entities::token::TokenPair;
use crate::errors::DomainResult;
use crate::repositories::{RefreshTokenStore, VerificationCodeStore};
use crate::services::token::TokenService;
use crate::services::verification::{MailSender, SendCodeResult, VerificationService};
use gs_shared::utils::mask_email;

/// Authentication service covering the full session flow
///
/// Credentials are checked upstream; `login` is called once the caller has
/// established who the user is.
pub struct AuthService<R, V, M>
where
    R: RefreshTokenStore,
    V: VerificationCodeStore,
    M: MailSender,
{
    /// Token service for JWT management
    token_service: Arc<TokenService<R>>,
    /// Verification service for email code handling
    verification_service: Arc<VerificationService<V, M>>,
}

impl<R, V, M> AuthService<R, V, M>
where
    R: RefreshTokenStore,
    V: VerificationCodeStore,
    M: MailSender,
{
    pub fn new(
        token_service: Arc<TokenService<R>>,
        verification_service: Arc<VerificationService<V, M>>,
    ) -> Self {
        Self {
            token_service,
            verification_service,
        }
    }

    pub fn token_service(&self) -> &TokenService<R> {
        &self.token_service
    }

    /// Send a registration verification code to `email`
    pub async fn send_code(&self, email: &str, now: DateTime<Utc>) -> DomainResult<SendCodeResult> {
        self.verification_service.send_code(email, now).await
    }

    /// Confirm the code previously sent to `email`
    pub async fn verify_code(&self, email: &str, code: &str, now: DateTime<Utc>) -> DomainResult<()> {
        self.verification_service.verify_code(email, code, now).await
    }

    /// Whether `email` recently passed verification; registration consults this
    pub async fn is_email_verified(&self, email: &str, now: DateTime<Utc>) -> DomainResult<bool> {
        self.verification_service.is_verified(email, now).await
    }

    /// Open a session for an already authenticated identity
    pub async fn login(&self, identity: &str, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        let pair = self.token_service.issue_token_pair(identity, now).await?;
        tracing::info!(identity = %mask_email(identity), event = "login", "User logged in");
        Ok(pair)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        self.token_service.rotate(refresh_token, now).await
    }

    /// Identity behind an Authorization header value, if it carries a valid access token
    pub fn authenticate(&self, header: Option<&str>, now: DateTime<Utc>) -> Option<String> {
        let token = self.token_service.extract_bearer(header)?;
        match self.token_service.extract_identity(token, now) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, event = "authentication_failed", "Rejected bearer token");
                None
            }
        }
    }

    /// End the session identified by the Authorization header value
    pub async fn logout(&self, header: Option<&str>, now: DateTime<Utc>) -> DomainResult<()> {
        self.token_service.logout(header, now).await
    }
}
