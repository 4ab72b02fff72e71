//! PostgreSQL integration tests.
//!
//! These tests load the sample students into the database named by
//! DATABASE_URL, replacing any existing student tables.

use askdb::config::{CacheConfig, ConnectionConfig};
use askdb::db::{DatabaseClient, PostgresClient, Value};
use askdb::llm::MockLlmClient;
use askdb::query::KeywordClassifier;
use askdb::{Assistant, Outcome};

use super::common::STUDENTS_SQL;

/// Helper to create a seeded test client.
async fn get_test_client() -> Option<PostgresClient> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    let client = PostgresClient::connect(&config).await.ok()?;
    client.execute_script(STUDENTS_SQL).await.ok()?;
    Some(client)
}

#[tokio::test]
async fn test_postgres_pipeline() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let tables = client.list_tables().await.unwrap();
    assert!(tables.contains(&"student_data".to_string()));

    let result = client
        .execute_query("SELECT name, age FROM student_data WHERE roll_no = 1")
        .await
        .unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].get("name"), Some(&Value::from("Aarav Shah")));
    assert_eq!(result.rows[0].get("age"), Some(&Value::Int(20)));

    let llm = MockLlmClient::new();
    let mut assistant = Assistant::new(
        Box::new(KeywordClassifier::default()),
        Box::new(llm),
        Box::new(client),
        CacheConfig::default(),
    );

    let count = assistant.ask("how many students are enrolled").await;
    assert_eq!(
        count.outcome,
        Outcome::Success("There are 6 students matching your query.".to_string())
    );

    let average = assistant.ask("average marks").await;
    assert!(average.outcome.text().starts_with("The average value is 77"));

    assistant.close().await.unwrap();
}
