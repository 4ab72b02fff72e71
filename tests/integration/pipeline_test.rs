//! End-to-end question answering against the sample student database.

use askdb::db::DatabaseClient;
use askdb::llm::MockLlmClient;
use askdb::query::formatter::NO_RECORDS_MESSAGE;
use askdb::Outcome;
use pretty_assertions::assert_eq;

use super::common::assistant;

fn success(text: &str) -> Outcome {
    Outcome::Success(text.to_string())
}

#[tokio::test]
async fn test_count_students_in_department() {
    let llm = MockLlmClient::new().with_response(
        "how many students in cs",
        "SELECT COUNT(*) FROM student_marks WHERE department = 'CS';",
    );
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("how many students in cs").await;
    assert_eq!(
        answer.outcome,
        success("There are 3 students matching your query.")
    );
}

#[tokio::test]
async fn test_single_student_details() {
    let llm = MockLlmClient::new().with_response(
        "maharashtra",
        "Here is the SQL:\n```sql\nSELECT d.roll_no, d.name, d.age, d.gender\nFROM student_data d\nJOIN student_address a ON d.roll_no = a.roll_no\nWHERE a.state = 'Maharashtra'\n```",
    );
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("list students in maharashtra").await;
    assert_eq!(
        answer.outcome,
        success("Student Details:\n• roll_no: 1\n• name: Aarav Shah\n• age: 20\n• gender: M")
    );
}

#[tokio::test]
async fn test_multiple_rows_listing() {
    let llm = MockLlmClient::new().with_response(
        "older than 20",
        "SELECT name, age FROM student_data WHERE age > 20 ORDER BY roll_no;",
    );
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("show students older than 20").await;
    assert_eq!(
        answer.outcome,
        success(
            "Found 3 students matching your query:\n\
             name: Diya Nair, age: 21\n\
             name: Meera Iyer, age: 22\n\
             name: Ananya Das, age: 21"
        )
    );
}

#[tokio::test]
async fn test_aggregates_with_default_sql() {
    let llm = MockLlmClient::new();
    let mut assistant = assistant(&llm).await;

    let average = assistant.ask("average marks of all students").await;
    assert_eq!(average.outcome, success("The average value is 77.0."));

    let max = assistant.ask("max marks scored").await;
    assert_eq!(max.outcome, success("The maximum value is 92."));

    let min = assistant.ask("min marks scored").await;
    assert_eq!(min.outcome, success("The minimum value is 59."));
}

#[tokio::test]
async fn test_no_matching_rows() {
    let llm = MockLlmClient::new().with_response(
        "goa",
        "SELECT d.name FROM student_data d JOIN student_address a ON d.roll_no = a.roll_no WHERE a.state = 'Goa';",
    );
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("list students in goa").await;
    assert_eq!(answer.outcome, success(NO_RECORDS_MESSAGE));
}

#[tokio::test]
async fn test_invalid_sql_reports_database_error() {
    let llm = MockLlmClient::new().with_response("grades", "SELECT * FROM student_grades;");
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("show grades of every student").await;
    assert!(answer.outcome.is_error());
    assert!(answer.outcome.text().starts_with("Database error: "));
    assert!(answer.outcome.text().contains("no such table"));
    assert_eq!(assistant.cache_sizes(), (0, 0));
}

#[tokio::test]
async fn test_general_question_bypasses_database() {
    let raw = "The capital of France is Paris.";
    let llm = MockLlmClient::new().with_response("capital of france", raw);
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("capital of france").await;
    assert_eq!(answer.outcome, success(raw));
    assert_eq!(assistant.cache_sizes(), (0, 1));
}

#[tokio::test]
async fn test_cached_answer_until_uncached_ask() {
    let llm = MockLlmClient::new().with_response(
        "how many students in cs",
        "SELECT COUNT(*) FROM student_marks WHERE department = 'CS';",
    );
    let mut assistant = assistant(&llm).await;

    let first = assistant.ask("how many students in cs").await;
    assert_eq!(first.outcome, success("There are 3 students matching your query."));

    assistant
        .database()
        .execute_script(
            "INSERT INTO student_data (roll_no, name, age, gender) VALUES (7, 'Ishaan Rao', 23, 'M');
             INSERT INTO student_marks (roll_no, department, subject, marks) VALUES (7, 'CS', 'Compilers', 71);",
        )
        .await
        .unwrap();

    let cached = assistant.ask("how many students in cs").await;
    assert_eq!(cached.outcome, first.outcome);

    let fresh = assistant.ask_uncached("how many students in cs").await;
    assert_eq!(fresh.outcome, success("There are 4 students matching your query."));

    // Both answers came from one generated statement.
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_blank_query_warns() {
    let llm = MockLlmClient::new();
    let mut assistant = assistant(&llm).await;

    let answer = assistant.ask("   ").await;
    assert_eq!(
        answer.outcome,
        Outcome::Warning("Please enter a query.".to_string())
    );
    assert_eq!(llm.call_count(), 0);
}
