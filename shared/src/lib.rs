//! Shared utilities and common types for the Gramstack server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and loading
//! - Logging initialisation
//! - Error response structures
//! - Utility functions (email validation, masking)

pub mod config;
pub mod errors;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, Environment, JwtConfig, LoggingConfig,
    VerificationConfig,
};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use utils::validation;
