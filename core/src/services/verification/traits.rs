//! Trait for outbound verification mail

use async_trait::async_trait;

use crate::errors::DomainError;

/// Delivers verification codes to an email address
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send `code` to `email`, returning a provider message id
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<String, DomainError>;
}
