//! Building an assistant from a configuration file.

use std::io::Write;

use askdb::config::Config;
use askdb::db::{self, DatabaseBackend, DatabaseClient};
use askdb::llm::create_client;
use askdb::query::{Classification, KeywordClassifier, QueryClassifier};
use askdb::{Assistant, Outcome};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use super::common::STUDENTS_SQL;

const CONFIG: &str = r#"
[llm]
provider = "mock"
model = "test-model"

[connections.default]
backend = "sqlite"
database = ":memory:"

[classifier]
extra_keywords = ["semester"]

[cache]
sql_capacity = 5
answer_capacity = 0
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_assistant_from_config_file() {
    let file = write_config(CONFIG);
    let config = Config::load_from_file(file.path()).unwrap();

    let connection = config.get_connection(None).unwrap();
    assert_eq!(connection.backend, DatabaseBackend::Sqlite);

    let database = db::connect(connection).await.unwrap();
    database.execute_script(STUDENTS_SQL).await.unwrap();

    let classifier = KeywordClassifier::from_config(&config.classifier);
    assert_eq!(
        classifier.classify("results this semester"),
        Classification::Student
    );

    let llm = create_client(&config.llm).unwrap();
    let mut assistant = Assistant::new(Box::new(classifier), llm, database, config.cache);

    let answer = assistant.ask("how many students are there").await;
    assert_eq!(
        answer.outcome,
        Outcome::Success("There are 6 students matching your query.".to_string())
    );
    // Answer cache disabled, SQL cache enabled.
    assert_eq!(assistant.cache_sizes(), (1, 0));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_file(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.llm.provider, "ollama");
    assert_eq!(config.cache.sql_capacity, 100);
    assert_eq!(config.cache.answer_capacity, 50);
    assert!(config.connections.is_empty());
}

#[test]
fn test_malformed_config_is_rejected() {
    let file = write_config("[cache]\nsql_capacity = \"lots\"\n");
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert_eq!(err.category(), "Configuration Error");
}
