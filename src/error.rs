//! Error types for askdb.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for askdb operations.
#[derive(Error, Debug)]
pub enum AskError {
    /// Completion service failures and responses that hold no usable SQL.
    #[error("Generation error: {0}")]
    Generation(String),

    /// Statement execution failures (syntax errors, permissions, timeouts, etc.)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, unknown provider, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (I/O on the terminal, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AskError {
    /// Creates a generation error with the given message.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Generation(_) => "Generation Error",
            Self::Execution(_) => "Execution Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    ///
    /// The assistant flattens every pipeline failure into one user-facing
    /// form, so the variant is dropped there.
    pub fn message(&self) -> &str {
        match self {
            Self::Generation(m)
            | Self::Execution(m)
            | Self::Connection(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }
}

/// Result type alias using AskError.
pub type Result<T> = std::result::Result<T, AskError>;
