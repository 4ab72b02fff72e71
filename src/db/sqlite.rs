//! SQLite database client implementation.
//!
//! Backs local files and in-memory databases. An in-memory database lives
//! only as long as its connection, so the pool is pinned to a single
//! connection that never idles out.

use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult, Row, Value, MAX_ROWS, QUERY_TIMEOUT};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as SqlxColumn, Row as SqlxRow};
use std::str::FromStr;
use std::time::Instant;
use tracing::debug;

/// SQLite database client.
#[derive(Debug)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Opens the database named by `config.database` (a path or `:memory:`).
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let path = config
            .database
            .as_deref()
            .ok_or_else(|| AskError::config("SQLite database path is required"))?;

        let options = if path == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| AskError::connection(e.to_string()))?
        } else {
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AskError::connection(format!("Cannot open SQLite database {path}: {e}")))?;

        debug!(path, "Opened SQLite database");
        Ok(Self { pool })
    }

    /// Opens a fresh in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect(&ConnectionConfig::sqlite(":memory:")).await
    }
}

#[async_trait]
impl DatabaseClient for SqliteClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let result = tokio::time::timeout(QUERY_TIMEOUT, sqlx::query(sql).fetch_all(&self.pool))
            .await
            .map_err(|_| {
                AskError::execution(format!(
                    "Query timed out after {} seconds",
                    QUERY_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|e| AskError::execution(format_query_error(e)))?;

        let rows: Vec<Row> = result.iter().map(convert_row).collect();
        Ok(QueryResult::capped(rows, MAX_ROWS, start.elapsed()))
    }

    async fn execute_script(&self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AskError::execution(format_query_error(e)))?;
        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AskError::execution(format!("Failed to fetch tables: {e}")))
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| (col.name().to_string(), convert_value(row, i)))
        .collect()
}

/// Converts a single column value.
///
/// SQLite is dynamically typed and expression columns such as `COUNT(*)`
/// carry no declared type, so decoding goes by the stored value: integer,
/// then real, then text, then blob.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map(Value::Int).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v.map(Value::Float).unwrap_or(Value::Null);
    }
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map(Value::String).unwrap_or(Value::Null);
    }
    row.try_get::<Option<Vec<u8>>, _>(index)
        .ok()
        .flatten()
        .map(Value::Bytes)
        .unwrap_or(Value::Null)
}

fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
