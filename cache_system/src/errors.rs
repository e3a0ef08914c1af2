//! Error types for cache operations
//!
//! This module defines all error types that can occur
//! during cache operations and Redis interactions.

use thiserror::Error;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Connection pool error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("General cache error: {0}")]
    General(String),
}

/// A cached value that could not be decoded into the requested shape.
///
/// Callers recover from this locally by falling back to the raw value.
#[derive(Error, Debug)]
#[error("cached value is not valid structured data: {reason}")]
pub struct DecodeMismatch {
    pub reason: String,
}

impl From<serde_json::Error> for DecodeMismatch {
    fn from(err: serde_json::Error) -> Self {
        Self {
            reason: err.to_string(),
        }
    }
}
