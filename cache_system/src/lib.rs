//! Cache system for Redis-based caching
//!
//! This crate provides the [`CacheStore`] contract, its Redis implementation
//! ([`CacheManager`]) and an in-process implementation ([`MemoryCache`]).

pub mod errors;
pub mod manager;
pub mod memory;
pub mod prelude;
pub mod store;
pub mod value;

// Re-export centralized config
pub use config::CacheConfig;

pub use errors::{CacheError, DecodeMismatch};
pub use manager::CacheManager;
pub use memory::MemoryCache;
pub use store::{CacheStore, KeyTtl};
pub use value::CachedValue;
