//! LLM integration for askdb.
//!
//! Provides the completion-service trait, provider implementations, the SQL
//! prompt, the response sanitizer, and the service that ties them together.

pub mod factory;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod sanitize;
pub mod service;
pub mod types;

pub use factory::create_client;
pub use mock::MockLlmClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use prompt::build_sql_prompt;
pub use sanitize::{sanitize_sql, SqlStatement};
pub use service::LlmService;
pub use types::{Message, Role};

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::Result;

/// Trait for completion services.
///
/// The service is treated as opaque text-in/text-out. Implementations must
/// be thread-safe (Send + Sync) to support async operations.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages.
    ///
    /// Returns the complete response as a single string.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Local Ollama instance
    #[default]
    Ollama,
    /// OpenAI or a compatible endpoint
    OpenAi,
    /// Mock client for testing (no network)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown LLM provider: {}", s)),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
