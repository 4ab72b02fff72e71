//! Line-oriented interactive loop.
//!
//! Each input line is one submission. Lines starting with `:` are session
//! commands; everything else goes to the assistant.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::assistant::{Answer, Assistant};
use crate::db::DatabaseClient;
use crate::error::{AskError, Result};

/// Prompt printed before each line is read.
pub const PROMPT: &str = "> ";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `:quit` or `:exit`
    Quit,
    /// `:clear`
    ClearCaches,
    /// Any other line, passed to the assistant as-is.
    Ask(String),
}

impl Command {
    /// Parses one input line. Surrounding whitespace is ignored when matching
    /// commands, but a question is passed on exactly as typed. Unknown `:`
    /// commands are treated as questions.
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            ":quit" | ":exit" => Self::Quit,
            ":clear" => Self::ClearCaches,
            _ => Self::Ask(line.to_string()),
        }
    }
}

/// Builds the startup banner from the database's table list.
pub async fn banner(db: &dyn DatabaseClient) -> Result<String> {
    let tables = db.list_tables().await?;
    let listing = if tables.is_empty() {
        "(none)".to_string()
    } else {
        tables.join(", ")
    };
    Ok(format!("Connected to database. Tables: {listing}"))
}

/// Renders an answer as the lines printed for it.
pub fn render_answer(answer: &Answer) -> String {
    format!("{}\n{}", answer.outcome, answer.timing_line())
}

/// Runs the read-answer loop until `:quit`/`:exit` or end of input.
pub async fn run<R, W>(assistant: &mut Assistant, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        write_out(output, PROMPT).await?;

        let Some(line) = lines.next_line().await.map_err(io_error)? else {
            write_out(output, "\n").await?;
            break;
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::ClearCaches => {
                assistant.clear_caches();
                write_out(output, "Caches cleared.\n").await?;
            }
            Command::Ask(query) => {
                let answer = assistant.ask(&query).await;
                write_out(output, &format!("{}\n", render_answer(&answer))).await?;
            }
        }
    }

    tracing::info!("Interactive session ended");
    Ok(())
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await.map_err(io_error)?;
    output.flush().await.map_err(io_error)
}

fn io_error(e: std::io::Error) -> AskError {
    AskError::internal(format!("Terminal I/O failed: {e}"))
}
