//! Verification code entity for email-based registration.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Email verification code awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    /// Normalized email address the code was sent to
    pub email: String,

    /// The numeric verification code
    pub code: String,

    /// Number of failed verification attempts
    pub attempts: u32,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Creates a code of `length` digits drawn from the OS random source
    pub fn generate(email: String, length: usize, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            email,
            code: Self::generate_code(length),
            attempts: 0,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    fn generate_code(length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    pub fn has_attempts_remaining(&self, max_attempts: u32) -> bool {
        self.attempts < max_attempts
    }

    /// Seconds left before another code may be sent, or `None` if allowed now
    pub fn cooldown_remaining(&self, cooldown: Duration, now: DateTime<Utc>) -> Option<i64> {
        let ready_at = self.created_at + cooldown;
        if now < ready_at {
            // Round up so a client waiting the reported time is never early
            let millis = (ready_at - now).num_milliseconds();
            Some((millis + 999) / 1000)
        } else {
            None
        }
    }
}
