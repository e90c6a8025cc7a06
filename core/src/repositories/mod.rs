pub mod token;
pub mod verification;

pub use token::{InMemoryRefreshTokenStore, RefreshTokenStore};
pub use verification::{InMemoryVerificationCodeStore, VerificationCodeStore};
