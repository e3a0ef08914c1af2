use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Query on {target} failed: {source}")]
    Query {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ValidationError),

    #[error("Source of record error: {0}")]
    Upstream(String),
}

impl SourceError {
    pub fn query(target: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Query {
            target: target.into(),
            source,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }
}
