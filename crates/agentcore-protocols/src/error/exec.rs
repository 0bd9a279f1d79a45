//! Command execution errors.
//!
//! A process that launched and exited non-zero is not an error; its exit
//! code travels in [`ExecutionResult`](crate::exec::ExecutionResult).

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to launch {command}: {source}")]
    LaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    #[error("Command was cancelled")]
    Cancelled,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid execution request: {0}")]
    InvalidRequest(String),

    #[error("I/O error while running command: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// True for errors caused by a deadline or a cancellation signal.
    ///
    /// A cancelled synchronous call is reported the same way as an expired
    /// timeout, so callers can treat both with one branch.
    pub fn is_deadline(&self) -> bool {
        matches!(self, ExecError::Timeout(_) | ExecError::Cancelled)
    }
}
