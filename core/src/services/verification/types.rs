//! Types for verification service results

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of sending a verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendCodeResult {
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the user can request another code
    pub next_resend_at: DateTime<Utc>,
    /// The message ID from the mail provider
    #[serde(skip)]
    pub message_id: String,
}
