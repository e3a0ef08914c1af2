//! Convenience re-exports for common record-source usage

pub use crate::errors::SourceError;
pub use crate::postgres::PgSource;
pub use crate::source::SourceOfRecord;
pub use crate::validation::{Identifier, ValidationError};
pub use crate::DbPool;

pub use async_trait::async_trait;
