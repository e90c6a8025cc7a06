//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Token type reported to clients alongside a token pair
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Subject tag carried in the `sub` claim of every token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectType {
    /// Short-lived token presented on every authenticated request
    #[serde(rename = "AccessToken")]
    Access,
    /// Long-lived token exchanged for a new pair; tracked in the store
    #[serde(rename = "RefreshToken")]
    Refresh,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Access => "AccessToken",
            SubjectType::Refresh => "RefreshToken",
        }
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
///
/// The identity lives under a configurable claim name, so it is kept in
/// `extra` rather than a fixed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject type
    pub sub: SubjectType,

    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,

    /// Random token id, distinct for every issued token
    pub jti: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    /// Creates claims carrying `identity` under `identity_claim` with a fresh `jti`
    pub fn new(subject: SubjectType, identity_claim: &str, identity: &str, exp: i64) -> Self {
        let mut extra = serde_json::Map::new();
        extra.insert(
            identity_claim.to_string(),
            serde_json::Value::String(identity.to_string()),
        );
        Self {
            sub: subject,
            exp,
            jti: format!("{:032x}", OsRng.gen::<u128>()),
            extra,
        }
    }

    /// Returns the identity stored under `identity_claim`, if it is a string
    pub fn identity(&self, identity_claim: &str) -> Option<&str> {
        self.extra.get(identity_claim).and_then(|v| v.as_str())
    }
}

/// A freshly signed token together with what it asserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub subject: SubjectType,
    pub identity: String,
    /// Expiry exactly as encoded in the token (whole seconds)
    pub expires_at: DateTime<Utc>,
}

/// Decoded content of a token that passed verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: SubjectType,
    pub identity: String,
    pub expires_at: DateTime<Utc>,
}

/// Token pair returned after successful login or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds, counted from issuance
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds, counted from issuance
    pub refresh_expires_in: i64,

    /// Always "Bearer"
    pub token_type: String,
}

impl TokenPair {
    /// Builds a pair from two issued tokens, measuring lifetimes from `now`
    pub fn from_issued(access: &IssuedToken, refresh: &IssuedToken, now: DateTime<Utc>) -> Self {
        Self {
            access_token: access.token.clone(),
            refresh_token: refresh.token.clone(),
            access_expires_in: (access.expires_at - now).num_seconds().max(0),
            refresh_expires_in: (refresh.expires_at - now).num_seconds().max(0),
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

/// Server-side record of the single active refresh token for an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    pub identity: String,
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn from_issued(issued: &IssuedToken, issued_at: DateTime<Utc>) -> Self {
        Self {
            identity: issued.identity.clone(),
            token: issued.token.clone(),
            issued_at,
            expires_at: issued.expires_at,
        }
    }

    /// Expired at `now`; exactly at expiry counts as expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
