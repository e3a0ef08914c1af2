//! Record Source - the source-of-record layer for Oddsline
//!
//! This crate provides the [`SourceOfRecord`] contract that read-through handlers fall
//! back to on cache miss, its Postgres implementation and identifier validation.

pub mod errors;
pub mod postgres;
pub mod prelude;
pub mod source;
pub mod validation;

pub use errors::SourceError;
pub use postgres::PgSource;
pub use source::SourceOfRecord;
pub use validation::{Identifier, ValidationError};

use sqlx::PgPool;

pub type DbPool = PgPool;
