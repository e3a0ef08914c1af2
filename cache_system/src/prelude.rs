//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::errors::{CacheError, DecodeMismatch};
pub use crate::manager::CacheManager;
pub use crate::memory::MemoryCache;
pub use crate::store::{CacheStore, KeyTtl};
pub use crate::value::CachedValue;

// Re-export centralized config
pub use config::CacheConfig;

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde_json;
