//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - HS512 token signing and verification
//! - Bearer header parsing
//! - Refresh token rotation and revocation

mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use codec::{TokenCodec, SIGNING_ALGORITHM};
pub use config::TokenServiceConfig;
pub use service::TokenService;
