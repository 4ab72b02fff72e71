//! HTTP transport shared by the Ollama and OpenAI clients.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AskError, Result};

pub(crate) fn client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AskError::internal(format!("Failed to create HTTP client: {e}")))
}

/// Joins a base URL and an API path, tolerating a trailing slash on the base.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}

/// POSTs `body` as JSON and returns the text of a successful response.
///
/// `service` names the provider in error messages.
pub(crate) async fn post_json<B: Serialize>(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    body: &B,
    service: &str,
) -> Result<String> {
    let mut request = client.post(url).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            AskError::generation(format!("{service} did not respond in time. Try again."))
        } else if e.is_connect() {
            AskError::generation(format!("Cannot reach {service} at {url}. Is it running?"))
        } else {
            AskError::generation(format!("{service} request failed: {e}"))
        }
    })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AskError::generation(format!("Failed to read {service} response: {e}")))?;

    if status.is_success() {
        Ok(text)
    } else {
        Err(api_error(service, status, &text))
    }
}

/// Error payloads: OpenAI nests an object under `error`, Ollama sends a string.
#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Text(String),
    Object { message: String },
}

fn api_error(service: &str, status: StatusCode, body: &str) -> AskError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return AskError::generation(format!(
                "{service} rejected the API key ({status}). Check llm.api_key or OPENAI_API_KEY."
            ));
        }
        StatusCode::TOO_MANY_REQUESTS => {
            return AskError::generation(format!(
                "{service} rate limit reached. Wait a moment and try again."
            ));
        }
        _ => {}
    }

    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ErrorDetail::Text(message) | ErrorDetail::Object { message },
        }) => message,
        Err(_) => body.trim().to_string(),
    };
    AskError::generation(format!("{service} API error ({status}): {detail}"))
}
