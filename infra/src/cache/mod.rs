//! Cache module for Redis-based storage
//!
//! Redis client with retry logic plus the Redis implementations of the
//! refresh token and verification code stores.

pub mod redis_client;
pub mod refresh_token_store;
pub mod verification_code_store;


pub use redis_client::RedisClient;
pub use refresh_token_store::RedisRefreshTokenStore;
pub use verification_code_store::RedisVerificationCodeStore;

// Re-export commonly used types
pub use gs_shared::config::CacheConfig;
