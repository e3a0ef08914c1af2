//! The cache store contract
//!
//! Every handler talks to the cache through [`CacheStore`] so the Redis client can be
//! swapped for [`crate::MemoryCache`] in tests.

use crate::errors::CacheError;
use crate::value::CachedValue;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// Remaining lifetime of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist
    Missing,
    /// The key exists and never expires
    Persistent,
    /// The key expires in this many seconds
    Expires(u64),
}

impl KeyTtl {
    /// Interpret a Redis `TTL` reply (-2 missing, -1 no expiry)
    pub fn from_redis(reply: i64) -> Self {
        match reply {
            -2 => Self::Missing,
            r if r < 0 => Self::Persistent,
            r => Self::Expires(r as u64),
        }
    }
}

/// Normalize a requested TTL: `None` and `Some(0)` both mean the entry never expires
pub fn expiry(ttl: Option<u64>) -> Option<u64> {
    ttl.filter(|seconds| *seconds > 0)
}

/// Writes take `ttl: Option<u64>` in seconds, interpreted by [`expiry`].
#[async_trait]
pub trait CacheStore: Send + Sync + Debug {
    /// Get a value; `Ok(None)` is a cache miss
    async fn get(&self, key: &str) -> Result<Option<CachedValue>, CacheError>;

    /// Store a structured value, expiring after `ttl` seconds or never
    async fn set(&self, key: &str, value: &Value, ttl: Option<u64>) -> Result<(), CacheError>;

    /// Store opaque bytes verbatim
    async fn set_raw(&self, key: &str, value: &[u8], ttl: Option<u64>) -> Result<(), CacheError>;

    /// Get one field of a hash
    async fn hash_get(&self, hash: &str, field: &str) -> Result<Option<CachedValue>, CacheError>;

    /// Get several fields of a hash, positionally aligned with `fields`.
    ///
    /// A server reply that is not one value per field comes back as an empty vector;
    /// callers fall back to [`CacheStore::hash_get`] per field.
    async fn hash_get_many(
        &self,
        hash: &str,
        fields: &[String],
    ) -> Result<Vec<Option<CachedValue>>, CacheError>;

    async fn ttl(&self, key: &str) -> Result<KeyTtl, CacheError>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn ping(&self) -> Result<String, CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_ttl_replies() {
        assert_eq!(KeyTtl::from_redis(-2), KeyTtl::Missing);
        assert_eq!(KeyTtl::from_redis(-1), KeyTtl::Persistent);
        assert_eq!(KeyTtl::from_redis(0), KeyTtl::Expires(0));
        assert_eq!(KeyTtl::from_redis(900), KeyTtl::Expires(900));
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        assert_eq!(expiry(None), None);
        assert_eq!(expiry(Some(0)), None);
        assert_eq!(expiry(Some(60)), Some(60));
    }
}
