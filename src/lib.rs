//! # Oddsline
//!
//! A read-through cache service for sports-betting analytics. Pre-computed datasets (hit
//! streaks, mispriced odds, EV plays, prop markets) live in Redis and Postgres; Oddsline
//! serves them over HTTP, consulting the cache first and back-filling it from the
//! database on a miss.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oddsline::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let oddsline = Oddsline::new(config).await?;
//!     oddsline.health_check().await?;
//!     oddsline.serve(std::future::pending()).await?;
//!     Ok(())
//! }
//! ```
//!
//! Any [`CacheStore`] / [`SourceOfRecord`] pair can back the router:
//!
//! ```rust
//! use oddsline::prelude::*;
//! use std::sync::Arc;
//!
//! # fn build(source: Arc<dyn SourceOfRecord>) {
//! let state = AppState::new(Arc::new(MemoryCache::new()), source, DatasetConfig::default());
//! let router = oddsline::http::build_router(state);
//! # }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod datasets;
pub mod envelope;
pub mod errors;
pub mod http;
pub mod keys;
pub mod prelude;
pub mod read_through;

pub use crate::core::Oddsline;
pub use envelope::{ApiError, CachePolicy};
pub use errors::OddslineError;
pub use http::AppState;
pub use keys::{CacheKey, Dataset};
pub use read_through::{CachedFetch, Fetched, Origin, Payload, ReadThroughError};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, DatasetConfig, ServerConfig};

// Re-export internal crates used in the public API
pub use cache_system;
pub use record_source;
pub use cache_system::{CacheStore, CachedValue};
pub use record_source::SourceOfRecord;
