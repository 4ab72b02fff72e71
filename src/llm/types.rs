//! Chat messages exchanged with a completion service.
//!
//! These serialize straight into the `messages` array both providers accept,
//! and Ollama's reply deserializes back into a [`Message`].

use serde::{Deserialize, Serialize};

/// Author of a chat turn. askdb sends user turns and reads assistant turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
