//! Main verification service implementation

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use std::future::Future;
use std::sync::Arc;

use crate::domain::entities::verification_code::VerificationCode;
use crate::errors::{DomainError, DomainResult, VerificationError};
use crate::repositories::VerificationCodeStore;
use crate::services::bounded::bounded_call;
use gs_shared::utils::{is_valid_email, mask_email, normalize_email};

use super::config::VerificationServiceConfig;
use super::traits::MailSender;
use super::types::SendCodeResult;

/// Verification service for email verification codes
pub struct VerificationService<S: VerificationCodeStore, M: MailSender> {
    store: Arc<S>,
    mail_sender: Arc<M>,
    config: VerificationServiceConfig,
}

impl<S: VerificationCodeStore, M: MailSender> VerificationService<S, M> {
    pub fn new(store: Arc<S>, mail_sender: Arc<M>, config: VerificationServiceConfig) -> Self {
        Self {
            store,
            mail_sender,
            config,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Send a fresh verification code to `email`
    ///
    /// This method:
    /// 1. Validates the email address
    /// 2. Refuses while the previous code is inside its resend cooldown
    /// 3. Generates and stores a new code, replacing any older one
    /// 4. Hands the code to the mail sender, removing it again if delivery fails
    pub async fn send_code(&self, email: &str, now: DateTime<Utc>) -> DomainResult<SendCodeResult> {
        let email = Self::checked_email(email)?;
        let masked = mask_email(&email);

        if let Some(existing) = self.bounded("find_code", self.store.find_code(&email)).await? {
            if !existing.is_expired_at(now) {
                if let Some(retry_after_seconds) =
                    existing.cooldown_remaining(self.config.resend_cooldown, now)
                {
                    tracing::warn!(
                        email = %masked,
                        retry_after_seconds,
                        event = "rate_limit_exceeded",
                        "Verification code requested during cooldown"
                    );
                    return Err(VerificationError::TooManyRequests {
                        retry_after_seconds,
                    }
                    .into());
                }
            }
        }

        let code = VerificationCode::generate(
            email.clone(),
            self.config.code_length,
            now,
            self.config.code_ttl,
        );
        self.bounded("save_code", self.store.save_code(&code, self.config.code_ttl))
            .await?;

        let message_id = match self
            .mail_sender
            .send_verification_code(&email, &code.code)
            .await
        {
            Ok(message_id) => message_id,
            Err(e) => {
                tracing::error!(
                    email = %masked,
                    error = %e,
                    event = "code_delivery_failed",
                    "Failed to deliver verification code"
                );
                if let Err(cleanup) = self.bounded("delete_code", self.store.delete_code(&email)).await {
                    tracing::warn!(email = %masked, error = %cleanup, "Failed to discard undelivered code");
                }
                return Err(VerificationError::DeliveryFailed.into());
            }
        };

        tracing::info!(
            email = %masked,
            message_id = %message_id,
            event = "code_sent",
            expires_at = %code.expires_at,
            "Verification code sent"
        );

        Ok(SendCodeResult {
            expires_at: code.expires_at,
            next_resend_at: now + self.config.resend_cooldown,
            message_id,
        })
    }

    /// Check `code` against the pending code for `email`
    ///
    /// A wrong code consumes one attempt. Once `max_attempts` are used the
    /// code is locked until it expires or a new one is sent.
    pub async fn verify_code(&self, email: &str, code: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let email = Self::checked_email(email)?;
        let masked = mask_email(&email);

        let mut stored = self
            .bounded("find_code", self.store.find_code(&email))
            .await?
            .ok_or(VerificationError::CodeNotFound)?;

        if stored.is_expired_at(now) {
            self.bounded("delete_code", self.store.delete_code(&email))
                .await?;
            tracing::debug!(email = %masked, event = "code_expired", "Verification code expired");
            return Err(VerificationError::CodeExpired.into());
        }

        if !stored.has_attempts_remaining(self.config.max_attempts) {
            tracing::warn!(email = %masked, event = "code_locked", "Verification attempts exhausted");
            return Err(VerificationError::MaxAttemptsExceeded.into());
        }

        if constant_time_eq(stored.code.as_bytes(), code.trim().as_bytes()) {
            // A failed mark leaves the code in place
            self.bounded(
                "mark_verified",
                self.store.mark_verified(&email, now, self.config.verified_ttl),
            )
            .await?;
            self.bounded("delete_code", self.store.delete_code(&email))
                .await?;
            tracing::info!(email = %masked, event = "code_verified", "Email verified");
            return Ok(());
        }

        stored.attempts += 1;
        let remaining_attempts = stored.remaining_attempts(self.config.max_attempts);
        self.bounded("save_code", self.store.save_code(&stored, stored.expires_at - now))
            .await?;

        tracing::warn!(
            email = %masked,
            remaining_attempts,
            event = "code_mismatch",
            "Invalid verification code"
        );
        Err(VerificationError::InvalidCode { remaining_attempts }.into())
    }

    /// Whether `email` completed verification recently enough to register
    pub async fn is_verified(&self, email: &str, now: DateTime<Utc>) -> DomainResult<bool> {
        let email = normalize_email(email);
        self.bounded("is_verified", self.store.is_verified(&email, now))
            .await
    }

    async fn bounded<T, F>(&self, operation: &'static str, call: F) -> DomainResult<T>
    where
        F: Future<Output = DomainResult<T>>,
    {
        bounded_call("verification code", operation, self.config.store_timeout, call).await
    }

    fn checked_email(email: &str) -> Result<String, DomainError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(VerificationError::InvalidEmail.into());
        }
        Ok(email)
    }
}
