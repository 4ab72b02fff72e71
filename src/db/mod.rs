//! Database abstraction layer for askdb.
//!
//! Provides a trait-based interface for executing generated statements,
//! allowing different database backends to be used interchangeably.

mod mock;
mod postgres;
mod sqlite;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use sqlite::SqliteClient;
pub use types::{QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Query timeout in seconds.
pub(crate) const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum rows to return from a query.
pub(crate) const MAX_ROWS: usize = 1000;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    #[default]
    Postgres,
    Sqlite,
}

impl DatabaseBackend {
    /// Returns the default port for this backend (0 when not networked).
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Postgres => 5432,
            Self::Sqlite => 0,
        }
    }
}

/// Creates a database client for the given backend and configuration.
///
/// This is the central factory function for database connections.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    match config.backend {
        DatabaseBackend::Postgres => {
            let client = PostgresClient::connect(config).await?;
            Ok(Box::new(client))
        }
        DatabaseBackend::Sqlite => {
            let client = SqliteClient::connect(config).await?;
            Ok(Box::new(client))
        }
    }
}

/// Trait defining the interface for database clients.
///
/// All operations are async and return Results with AskError. Statement
/// failures surface as `AskError::Execution`.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Executes a single SQL statement and returns its rows.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Executes a multi-statement script (schema setup, seed data).
    async fn execute_script(&self, sql: &str) -> Result<()>;

    /// Lists user table names, sorted.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
