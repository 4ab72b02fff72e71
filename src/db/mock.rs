//! Mock database clients for testing.
//!
//! `MockDatabaseClient` returns canned results keyed on SQL substrings and
//! records every statement it receives; `FailingDatabaseClient` rejects
//! everything.

use super::{DatabaseClient, QueryResult};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// A mock database client that returns predefined results.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    /// Canned results (SQL substring -> result), checked in insertion order.
    results: Vec<(String, QueryResult)>,
    tables: Vec<String>,
    executed: Mutex<Vec<String>>,
}

impl MockDatabaseClient {
    /// Creates a mock that returns an empty result for every statement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a canned result returned when the SQL contains `pattern`
    /// (case-insensitive).
    pub fn with_result(mut self, pattern: impl Into<String>, result: QueryResult) -> Self {
        self.results.push((pattern.into().to_lowercase(), result));
        self
    }

    /// Sets the table names reported by `list_tables`.
    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables = tables.into_iter().map(Into::into).collect();
        self
    }

    /// Returns every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut log) = self.executed.lock() {
            log.push(sql.to_string());
        }

        let sql_lower = sql.to_lowercase();
        let result = self
            .results
            .iter()
            .find(|(pattern, _)| sql_lower.contains(pattern))
            .map(|(_, result)| result.clone())
            .unwrap_or_default();

        Ok(result)
    }

    async fn execute_script(&self, sql: &str) -> Result<()> {
        if let Ok(mut log) = self.executed.lock() {
            log.push(sql.to_string());
        }
        Ok(())
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every statement fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a client that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(AskError::execution(self.message.clone()))
    }

    async fn execute_script(&self, _sql: &str) -> Result<()> {
        Err(AskError::execution(self.message.clone()))
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        Err(AskError::execution(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
