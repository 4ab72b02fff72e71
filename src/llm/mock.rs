//! Mock LLM client for testing.
//!
//! Provides deterministic responses based on input patterns.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{AskError, Result};
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Marker that precedes the user's question inside the SQL prompt.
const QUERY_MARKER: &str = "Query: '";

/// Mock LLM client that returns canned responses based on input patterns.
///
/// Clones share the call counter, so a test can keep a handle after boxing
/// the client into an assistant.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with this message.
    failure: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the input contains `pattern` (case-insensitive), the mock returns
    /// `response`. Custom mappings are checked before the defaults.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every call fail with a generation error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Returns how many completions have been requested.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Generates a mock response based on the input.
    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        match extract_prompt_query(input) {
            Some(query) => default_sql(&query.to_lowercase()),
            None => format!("Mock answer for: {}", input.trim()),
        }
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

/// Returns the quoted question from a SQL prompt, if the input is one.
fn extract_prompt_query(input: &str) -> Option<&str> {
    let start = input.rfind(QUERY_MARKER)? + QUERY_MARKER.len();
    let rest = &input[start..];
    Some(rest.strip_suffix('\'').unwrap_or(rest))
}

fn default_sql(query: &str) -> String {
    let sql = if query.contains("how many") || query.contains("count") || query.contains("number of")
    {
        "SELECT COUNT(*) FROM student_data;"
    } else if query.contains("average") || query.contains("avg") {
        "SELECT AVG(marks) FROM student_marks;"
    } else if query.contains("max") {
        "SELECT MAX(marks) FROM student_marks;"
    } else if query.contains("min") {
        "SELECT MIN(marks) FROM student_marks;"
    } else {
        "SELECT * FROM student_data;"
    };
    format!("```sql\n{sql}\n```")
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(AskError::generation(message.clone()));
        }

        let input = Self::extract_user_input(messages);
        Ok(self.mock_response(&input))
    }
}
