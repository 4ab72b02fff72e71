//! Shared helpers for the integration tests.

use askdb::config::CacheConfig;
use askdb::db::{DatabaseClient, SqliteClient};
use askdb::llm::MockLlmClient;
use askdb::query::KeywordClassifier;
use askdb::Assistant;

/// The sample student database script.
pub const STUDENTS_SQL: &str = include_str!("../../fixtures/students.sql");

/// Opens an in-memory database loaded with the sample students.
pub async fn seeded_db() -> SqliteClient {
    let db = SqliteClient::in_memory().await.unwrap();
    db.execute_script(STUDENTS_SQL).await.unwrap();
    db
}

/// Builds an assistant over the seeded database and the given mock LLM.
pub async fn assistant(llm: &MockLlmClient) -> Assistant {
    Assistant::new(
        Box::new(KeywordClassifier::default()),
        Box::new(llm.clone()),
        Box::new(seeded_db().await),
        CacheConfig::default(),
    )
}
