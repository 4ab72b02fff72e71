//! LLM service for the two completion-backed operations.
//!
//! `extract_sql` turns a student-database question into a sanitized
//! statement; `answer_general` forwards a general-knowledge question
//! verbatim. Each call makes exactly one completion request; memoization
//! belongs to the caller.

use std::time::Instant;

use crate::error::Result;

use super::{build_sql_prompt, sanitize_sql, LlmClient, Message, SqlStatement};

/// Wraps a completion client with the prompts askdb sends it.
pub struct LlmService {
    client: Box<dyn LlmClient>,
}

impl LlmService {
    /// Creates a new LLM service.
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Generates a single SQL statement answering `query`.
    ///
    /// The prompt goes out as one user message. Fails with a generation error
    /// if the service is unreachable or its reply holds no statement.
    pub async fn extract_sql(&self, query: &str) -> Result<SqlStatement> {
        let start = Instant::now();
        let prompt = build_sql_prompt(query);

        tracing::debug!(prompt_len = prompt.len(), "Requesting SQL from LLM");

        let raw = self.client.complete(&[Message::user(prompt)]).await?;
        let raw = raw.trim();

        tracing::debug!(
            llm_duration_ms = start.elapsed().as_millis(),
            response_len = raw.len(),
            "Received LLM response"
        );

        let sql = sanitize_sql(raw)?;

        tracing::info!(
            total_duration_ms = start.elapsed().as_millis(),
            sql_len = sql.as_str().len(),
            "NL→SQL processing complete"
        );

        Ok(sql)
    }

    /// Forwards a general-knowledge question and returns the raw reply.
    pub async fn answer_general(&self, query: &str) -> Result<String> {
        let start = Instant::now();
        let answer = self.client.complete(&[Message::user(query)]).await?;

        tracing::info!(
            total_duration_ms = start.elapsed().as_millis(),
            answer_len = answer.len(),
            "General answer received"
        );

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AskError;
    use crate::llm::MockLlmClient;

    #[tokio::test]
    async fn test_extract_sql_sanitizes_response() {
        let mock = MockLlmClient::new().with_response(
            "students older than 20",
            "Here you go:\n```sql\nSELECT name\nFROM student_data\nWHERE age > 20\n```",
        );
        let service = LlmService::new(Box::new(mock.clone()));

        let sql = service
            .extract_sql("students older than 20")
            .await
            .unwrap();

        assert_eq!(sql.as_str(), "SELECT name FROM student_data WHERE age > 20;");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_extract_sql_rejects_prose() {
        let mock = MockLlmClient::new()
            .with_response("favourite colour", "Sorry, the tables do not store that.");
        let service = LlmService::new(Box::new(mock));

        let err = service
            .extract_sql("favourite colour of each student")
            .await
            .unwrap_err();
        assert!(matches!(err, AskError::Generation(_)));
    }

    #[tokio::test]
    async fn test_extract_sql_propagates_client_failure() {
        let service = LlmService::new(Box::new(MockLlmClient::failing("connection refused")));
        let err = service.extract_sql("list students").await.unwrap_err();
        assert_eq!(err.message(), "connection refused");
    }

    #[tokio::test]
    async fn test_answer_general_is_verbatim() {
        let raw = "  The capital of France is **Paris**.\n";
        let mock = MockLlmClient::new().with_response("capital of france", raw);
        let service = LlmService::new(Box::new(mock));

        assert_eq!(service.answer_general("capital of france").await.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_answer_general_sends_query_unchanged() {
        let mock = MockLlmClient::new();
        let service = LlmService::new(Box::new(mock.clone()));

        let answer = service.answer_general("  Who wrote Hamlet?").await.unwrap();
        assert_eq!(answer, "Mock answer for: Who wrote Hamlet?");
        assert_eq!(mock.call_count(), 1);
    }
}
