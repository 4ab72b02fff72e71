//! Interactive session against the sample student database.

use askdb::llm::MockLlmClient;
use askdb::repl;
use pretty_assertions::assert_eq;

use super::common::{assistant, seeded_db};

#[tokio::test]
async fn test_banner_lists_student_tables() {
    let db = seeded_db().await;
    assert_eq!(
        repl::banner(&db).await.unwrap(),
        "Connected to database. Tables: student_address, student_data, student_marks"
    );
}

#[tokio::test]
async fn test_session_transcript() {
    let llm = MockLlmClient::new()
        .with_response(
            "how many students in ds",
            "SELECT COUNT(*) FROM student_marks WHERE department = 'DS';",
        )
        .with_response("capital of japan", "Tokyo.");
    let mut assistant = assistant(&llm).await;

    let script = "how many students in ds\ncapital of japan\n\n:clear\nhow many students in ds\n:quit\nnever read\n";
    let mut output = Vec::new();
    repl::run(&mut assistant, script.as_bytes(), &mut output)
        .await
        .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert_eq!(
        output
            .matches("There are 2 students matching your query.")
            .count(),
        2
    );
    assert!(output.contains("Tokyo.\nProcessed in "));
    assert!(output.contains("Warning: Please enter a query.\nProcessed in "));
    assert!(output.contains("Caches cleared."));
    assert!(!output.contains("never read"));
    assert_eq!(llm.call_count(), 3);
}
