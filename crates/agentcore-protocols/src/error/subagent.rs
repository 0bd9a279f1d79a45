//! Subagent lifecycle errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubagentError {
    #[error("Subagent not found: {0}")]
    NotFound(String),

    #[error("Subagent already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid subagent context: {0}")]
    InvalidContext(String),

    #[error("Max concurrent subagents ({0}) reached")]
    LimitReached(usize),

    #[error("Subagent execution failed: {0}")]
    ExecutionFailed(String),
}
