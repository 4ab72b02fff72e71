//! Chat-completions client for OpenAI or any server that speaks the same
//! protocol (point `llm.base_url` at it).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{AskError, Result};
use crate::llm::types::Message;
use crate::llm::{http, LlmClient};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: http::client(timeout)?,
            url: http::endpoint(base_url, "chat/completions"),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// `content` is null when the model answers with tool calls instead of text.
#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
        };
        debug!(model = %self.model, url = %self.url, "Sending chat completion request");

        let body = http::post_json(
            &self.http,
            &self.url,
            Some(&self.api_key),
            &request,
            "OpenAI",
        )
        .await?;
        first_choice(&body)
    }
}

fn first_choice(body: &str) -> Result<String> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| AskError::generation(format!("Unexpected OpenAI response: {e}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| AskError::generation("OpenAI returned no completion text"))
}
