//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::config::LlmConfig;
use crate::error::{AskError, Result};
use crate::llm::ollama::DEFAULT_OLLAMA_URL;
use crate::llm::openai::DEFAULT_OPENAI_URL;
use crate::llm::{LlmClient, LlmProvider, MockLlmClient, OllamaClient, OpenAiClient};
use std::time::Duration;

/// Creates an LLM client from the `[llm]` configuration section.
///
/// Gaps are filled from the environment:
/// - Ollama: `OLLAMA_URL` for the base URL, `OLLAMA_MODEL` overrides the model
/// - OpenAI: `OPENAI_API_KEY` when no key is configured
pub fn create_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    let provider: LlmProvider = config.provider.parse().map_err(AskError::config)?;

    let timeout = Duration::from_secs(config.timeout_secs);

    match provider {
        LlmProvider::Ollama => {
            let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| config.model.clone());
            let base_url = config
                .base_url
                .clone()
                .or_else(|| std::env::var("OLLAMA_URL").ok())
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Ok(Box::new(OllamaClient::new(&base_url, model, timeout)?))
        }
        LlmProvider::OpenAi => {
            let key = config
                .api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .ok_or_else(|| {
                    AskError::config("No API key configured. Set llm.api_key or OPENAI_API_KEY.")
                })?;
            let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_URL);
            Ok(Box::new(OpenAiClient::new(
                base_url,
                key,
                config.model.clone(),
                timeout,
            )?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}
