//! Mail sender that writes to the log instead of delivering
//!
//! Intended for development and test environments. The code itself is only
//! emitted at `debug` level.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

use gs_core::errors::DomainError;
use gs_core::services::MailSender;
use gs_shared::utils::mask_email;

#[derive(Debug, Default)]
pub struct LogMailSender {
    sent: AtomicU64,
}

impl LogMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages "sent" so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MailSender for LogMailSender {
    async fn send_verification_code(&self, email: &str, code: &str) -> Result<String, DomainError> {
        let sequence = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
        let message_id = format!("log-{}", sequence);

        tracing::info!(
            email = %mask_email(email),
            message_id = %message_id,
            "Verification mail written to log"
        );
        tracing::debug!(email = %mask_email(email), code, "Verification code");

        Ok(message_id)
    }
}
