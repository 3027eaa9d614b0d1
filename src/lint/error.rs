//! Lint pipeline error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("'{command}' produced no output")]
    EmptyOutput { command: String },

    #[error("malformed tool output: {0}")]
    MalformedOutput(String),
}

pub type LintResult<T> = Result<T, LintError>;
