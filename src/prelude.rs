//! Convenience re-exports for common Oddsline usage
//!
//! ```rust
//! use oddsline::prelude::*;
//! ```

// Core components
pub use crate::core::Oddsline;
pub use crate::envelope::{ApiError, CachePolicy};
pub use crate::errors::OddslineError;
pub use crate::http::{AppState, build_router};
pub use crate::keys::{CacheKey, Dataset};
pub use crate::read_through::{CachedFetch, Fetched, Origin, Payload, ReadThroughError};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, DatabaseConfig, DatasetConfig, ServerConfig};

// Backends
pub use cache_system::prelude::*;
pub use record_source::prelude::*;

// Common external dependencies
pub use async_trait;
pub use tokio;
