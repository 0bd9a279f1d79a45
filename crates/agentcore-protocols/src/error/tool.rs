//! Tool adapter errors.

use thiserror::Error;

use super::{ExecError, SecurityError, SkillError, SubagentError};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Execution error: {0}")]
    Exec(#[from] ExecError),

    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    #[error("Skill error: {0}")]
    Skill(#[from] SkillError),

    #[error("Subagent error: {0}")]
    Subagent(#[from] SubagentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
