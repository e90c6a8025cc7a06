//! Signing and verification of compact HS512 JWTs

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, SubjectType, VerifiedToken};
use crate::errors::{DomainError, TokenError};

/// The only algorithm tokens may be signed or verified with
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Pure token codec: no I/O, no clock of its own
///
/// Expiry is checked against the `now` passed to [`verify`](Self::verify)
/// at millisecond resolution; a token is expired from the exact instant
/// encoded in `exp`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    identity_claim: String,
}

impl TokenCodec {
    pub fn new(secret: &str, identity_claim: impl Into<String>) -> Result<Self, DomainError> {
        if secret.is_empty() {
            return Err(DomainError::Configuration {
                message: "JWT secret must not be empty".to_string(),
            });
        }

        // Header `alg` must be HS512; `exp` is checked by hand against the caller's clock
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            identity_claim: identity_claim.into(),
        })
    }

    pub fn identity_claim(&self) -> &str {
        &self.identity_claim
    }

    /// Sign a token; `expires_at` is encoded at whole-second precision
    ///
    /// Every call yields a different token, even for identical inputs.
    pub fn sign(
        &self,
        subject: SubjectType,
        identity: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(subject, &self.identity_claim, identity, expires_at.timestamp());

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, subject = %subject, "Failed to encode JWT");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Verify signature, shape and expiry of `token` at `now`
    ///
    /// Every failure is reported as [`TokenError::InvalidToken`]; the cause
    /// only reaches the logs.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidAlgorithm => {
                    tracing::warn!(event = "token_rejected", "Token declares a foreign algorithm")
                }
                ErrorKind::InvalidSignature => {
                    tracing::warn!(event = "token_rejected", "Token signature mismatch")
                }
                _ => tracing::debug!(event = "token_rejected", error = %e, "Malformed token"),
            }
            DomainError::invalid_token()
        })?;
        let claims = data.claims;

        if now.timestamp_millis() >= claims.exp.saturating_mul(1000) {
            tracing::debug!(event = "token_rejected", exp = claims.exp, "Token expired");
            return Err(DomainError::invalid_token());
        }

        let identity = match claims.identity(&self.identity_claim) {
            Some(identity) if !identity.is_empty() => identity.to_string(),
            _ => {
                tracing::debug!(
                    event = "token_rejected",
                    claim = %self.identity_claim,
                    "Token lacks identity claim"
                );
                return Err(DomainError::invalid_token());
            }
        };

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(DomainError::invalid_token)?;

        Ok(VerifiedToken {
            subject: claims.sub,
            identity,
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("identity_claim", &self.identity_claim)
            .finish_non_exhaustive()
    }
}
