//! Client for a local Ollama server, the default completion service.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{AskError, Result};
use crate::llm::types::Message;
use crate::llm::{http, LlmClient};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Sends the conversation to `/api/chat` with streaming off and returns the
/// single reply.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http::client(timeout)?,
            url: http::endpoint(base_url, "api/chat"),
            model: model.into(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Message,
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };
        debug!(model = %self.model, url = %self.url, "Sending Ollama chat request");

        let body = http::post_json(&self.http, &self.url, None, &request, "Ollama").await?;
        Ok(parse_reply(&body)?.content)
    }
}

fn parse_reply(body: &str) -> Result<Message> {
    serde_json::from_str::<ChatResponse>(body)
        .map(|reply| reply.message)
        .map_err(|e| AskError::generation(format!("Unexpected Ollama response: {e}")))
}
