use crate::errors::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

/// The authoritative data provider consulted on cache miss
#[async_trait]
pub trait SourceOfRecord: Send + Sync + Debug {
    /// Call a named database function and return its rows in order.
    ///
    /// Arguments are passed by name as text; the function casts them as needed.
    async fn rpc(&self, function: &str, args: &[(&str, &str)]) -> Result<Vec<Value>, SourceError>;

    /// Fetch the first row of `table` whose `id_column` equals `id`
    async fn select_by_id(
        &self,
        table: &str,
        id_column: &str,
        id: &str,
    ) -> Result<Option<Value>, SourceError>;

    async fn ping(&self) -> Result<(), SourceError>;
}
