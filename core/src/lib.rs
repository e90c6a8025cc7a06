//! # Gramstack Core
//!
//! Core business logic for the Gramstack authentication backend.
//! This crate contains domain entities, business services, store interfaces
//! and error types. I/O-backed store implementations live in `gs_infra`.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Claims, IssuedToken, RefreshTokenRecord, SubjectType, TokenPair, VerificationCode,
    VerifiedToken,
};
pub use errors::{DomainError, DomainResult, TokenError, VerificationError};
pub use repositories::{
    InMemoryRefreshTokenStore, InMemoryVerificationCodeStore, RefreshTokenStore,
    VerificationCodeStore,
};
pub use services::{
    AuthService, MailSender, SendCodeResult, TokenCodec, TokenService, TokenServiceConfig,
    VerificationService, VerificationServiceConfig,
};
