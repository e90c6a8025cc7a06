//! Domain entities representing core business objects.

pub mod token;
pub mod verification_code;

// Re-export commonly used types
pub use token::{
    Claims, IssuedToken, RefreshTokenRecord, SubjectType, TokenPair, VerifiedToken,
    TOKEN_TYPE_BEARER,
};
pub use verification_code::{VerificationCode, CODE_LENGTH};
