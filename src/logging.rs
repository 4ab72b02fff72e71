//! Logging configuration for askdb.
//!
//! Interactive sessions log to a file so log lines never interleave with the
//! prompt; one-shot runs log to stderr, leaving stdout to the answer.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_DIR: &str = "askdb";
const LOG_FILE: &str = "askdb.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging for interactive mode.
///
/// Location: `~/.local/state/askdb/askdb.log` on Linux (XDG state directory),
/// or the platform-appropriate state/config directory on other systems.
/// The file is truncated on each run.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging for one-shot mode.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the path for the log file.
///
/// Prefers the state directory, then the config directory, then the temp
/// directory.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return log_path_in(&state_dir);
    }

    if let Some(config_dir) = dirs::config_dir() {
        return log_path_in(&config_dir);
    }

    std::env::temp_dir().join(LOG_FILE)
}

fn log_path_in(base: &Path) -> PathBuf {
    base.join(LOG_DIR).join(LOG_FILE)
}
