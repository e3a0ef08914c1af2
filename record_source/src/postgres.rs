//! Postgres source of record
//!
//! Supabase exposes plain Postgres, so RPCs become `SELECT ... FROM function(...)` and
//! table lookups become filtered selects. Rows are returned as JSON via `to_jsonb`.

use crate::errors::SourceError;
use crate::source::SourceOfRecord;
use crate::validation::Identifier;
use crate::DbPool;
use async_trait::async_trait;
use config::DatabaseConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PgSource {
    pool: DbPool,
}

impl PgSource {
    /// Connect a pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, SourceError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// `SELECT to_jsonb(r) FROM f(a => $1, b => $2) AS r`
pub(crate) fn rpc_sql(function: &Identifier, arg_names: &[Identifier]) -> String {
    let params = arg_names
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} => ${}", name, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT to_jsonb(r) FROM {}({}) AS r", function, params)
}

pub(crate) fn select_by_id_sql(table: &Identifier, id_column: &Identifier) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {} AS t WHERE t.{}::text = $1 LIMIT 1",
        table, id_column
    )
}

#[async_trait]
impl SourceOfRecord for PgSource {
    async fn rpc(&self, function: &str, args: &[(&str, &str)]) -> Result<Vec<Value>, SourceError> {
        let function = Identifier::new(function)?;
        let arg_names = args
            .iter()
            .map(|(name, _)| Identifier::new(name))
            .collect::<Result<Vec<_>, _>>()?;
        let sql = rpc_sql(&function, &arg_names);

        let mut query = sqlx::query_scalar::<_, Value>(&sql);
        for (_, value) in args {
            query = query.bind(value.to_string());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| SourceError::query(function.as_str(), e))?;
        debug!(function = %function, rows = rows.len(), "rpc completed");
        Ok(rows)
    }

    async fn select_by_id(
        &self,
        table: &str,
        id_column: &str,
        id: &str,
    ) -> Result<Option<Value>, SourceError> {
        let table = Identifier::new(table)?;
        let id_column = Identifier::new(id_column)?;
        let sql = select_by_id_sql(&table, &id_column);

        sqlx::query_scalar::<_, Value>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SourceError::query(table.as_str(), e))
    }

    /// Check database connection health
    async fn ping(&self) -> Result<(), SourceError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
