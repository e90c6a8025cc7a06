//! Authentication service module
//!
//! Facade over token issuance and email verification, shaped after the
//! endpoints a controller layer exposes: send-code, verify-code, login,
//! refresh and logout.

mod service;


pub use service::AuthService;
