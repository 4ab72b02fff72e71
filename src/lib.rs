//! askdb - ask questions about a student database in plain English.
//!
//! Questions about students are turned into SQL by a language model, run
//! against the database, and summarized; anything else is answered by the
//! model directly. This library exposes the modules the binary and the
//! integration tests are built from.

pub mod assistant;
pub mod cache;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod query;
pub mod repl;

pub use assistant::{Answer, Assistant, Outcome};
pub use error::{AskError, Result};
