//! Error types for the Oddsline crate
//!
//! Request-level failures are [`ApiError`](crate::envelope::ApiError); this enum covers
//! startup and serving.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OddslineError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Source(#[from] record_source::SourceError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache_system::CacheError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
