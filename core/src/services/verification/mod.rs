//! Verification service module for email-based registration
//!
//! This module provides the verification code workflow:
//! - Code generation and delivery through a [`MailSender`]
//! - Code verification with attempt tracking
//! - Resend cooldown

mod config;
mod service;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::MailSender;
pub use types::SendCodeResult;
