//! Business services containing domain logic and use cases.

pub mod auth;
mod bounded;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use auth::AuthService;
pub use token::{TokenCodec, TokenService, TokenServiceConfig};
pub use verification::{
    MailSender, SendCodeResult, VerificationService, VerificationServiceConfig,
};
