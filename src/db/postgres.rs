//! PostgreSQL database client.
//!
//! Connecting is a single attempt; a failure is reported straight back to
//! the caller as a connection error.

use crate::config::ConnectionConfig;
use crate::db::{DatabaseClient, QueryResult, Row, Value, MAX_ROWS, QUERY_TIMEOUT};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use sqlx::postgres::{PgConnectOptions, PgDatabaseError, PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as SqlxColumn, Decode, Postgres, Row as SqlxRow, Type, TypeInfo};
use std::time::{Duration, Instant};
use tracing::debug;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let database = config
            .database
            .as_deref()
            .ok_or_else(|| AskError::config("Database name is required"))?;

        let mut options = PgConnectOptions::new()
            .host(config.host.as_deref().unwrap_or("localhost"))
            .port(config.port)
            .database(database);
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| connection_error(e, config))?;

        debug!(target = %config.display_string(), "Connected to PostgreSQL");
        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();

        let fetched = tokio::time::timeout(QUERY_TIMEOUT, sqlx::query(sql).fetch_all(&self.pool))
            .await
            .map_err(|_| {
                AskError::execution(format!(
                    "Query timed out after {} seconds",
                    QUERY_TIMEOUT.as_secs()
                ))
            })?
            .map_err(|e| AskError::execution(statement_error(e)))?;

        let rows: Vec<Row> = fetched.iter().map(convert_row).collect();
        Ok(QueryResult::capped(rows, MAX_ROWS, start.elapsed()))
    }

    async fn execute_script(&self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AskError::execution(statement_error(e)))?;
        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(
            "SELECT tablename::text FROM pg_catalog.pg_tables \
             WHERE schemaname = current_schema() ORDER BY tablename",
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

fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .map(|col| {
            let value = convert_value(row, col.ordinal(), col.type_info().name());
            (col.name().to_string(), value)
        })
        .collect()
}

fn decode<'r, T>(row: &'r PgRow, index: usize) -> Option<T>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    row.try_get::<Option<T>, _>(index).ok().flatten()
}

/// Decodes one column by its Postgres type name. Types without a mapping
/// are read as text and become NULL if that fails too.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    let value = match type_name {
        "BOOL" => decode::<bool>(row, index).map(Value::Bool),
        "INT2" => decode::<i16>(row, index).map(|v| Value::Int(v.into())),
        "INT4" => decode::<i32>(row, index).map(|v| Value::Int(v.into())),
        "INT8" => decode::<i64>(row, index).map(Value::Int),
        "FLOAT4" => decode::<f32>(row, index).map(|v| Value::Float(v.into())),
        "FLOAT8" => decode::<f64>(row, index).map(Value::Float),
        // AVG over integer columns comes back as NUMERIC.
        "NUMERIC" => decode::<BigDecimal>(row, index).map(numeric_value),
        "BYTEA" => decode::<Vec<u8>>(row, index).map(Value::Bytes),
        _ => decode::<String>(row, index).map(Value::String),
    };
    value.unwrap_or(Value::Null)
}

/// Decimals are shown like SQLite's REAL results; text keeps values `f64`
/// cannot hold.
fn numeric_value(decimal: BigDecimal) -> Value {
    match decimal.to_f64() {
        Some(f) if f.is_finite() => Value::Float(f),
        _ => Value::String(decimal.normalized().to_string()),
    }
}

fn connection_error(error: sqlx::Error, config: &ConnectionConfig) -> AskError {
    let target = config.display_string();
    let message = match &error {
        sqlx::Error::Io(e) => format!("Cannot reach {target}: {e}"),
        sqlx::Error::PoolTimedOut => format!("Timed out connecting to {target}"),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            // invalid_password, invalid_authorization_specification
            Some("28P01") | Some("28000") => format!(
                "Authentication failed for user '{}'",
                config.user.as_deref().unwrap_or_default()
            ),
            // invalid_catalog_name
            Some("3D000") => format!("Database {target} does not exist"),
            _ => db.message().to_string(),
        },
        _ => format!("Cannot connect to {target}: {error}"),
    };
    AskError::connection(message)
}

/// Server message plus the DETAIL and HINT lines Postgres attaches.
fn statement_error(error: sqlx::Error) -> String {
    let Some(db_error) = error.as_database_error() else {
        return error.to_string();
    };
    let mut message = db_error.message().to_string();
    if let Some(pg) = db_error.try_downcast_ref::<PgDatabaseError>() {
        for (label, extra) in [("DETAIL", pg.detail()), ("HINT", pg.hint())] {
            if let Some(extra) = extra {
                message.push_str(&format!("\n  {label}: {extra}"));
            }
        }
    }
    message
}
