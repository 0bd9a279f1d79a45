//! Tool execution context.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

/// Context for one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Conversation or subagent context the call belongs to.
    pub session_id: String,

    /// Caller identity, used as the rate-limit key's user half.
    pub user_id: String,

    /// Working directory for relative paths.
    pub work_dir: PathBuf,

    /// Tool allow-list copied from the active skill. Empty means unrestricted.
    pub allowed_tools: Vec<String>,

    /// Cancellation signal for the invocation.
    pub cancel: CancellationToken,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>, work_dir: PathBuf) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: String::from("anonymous"),
            work_dir,
            allowed_tools: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_allowed_tools(mut self, tools: Vec<String>) -> Self {
        self.allowed_tools = tools;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether `tool_id` may run under the active restriction.
    pub fn is_tool_allowed(&self, tool_id: &str) -> bool {
        self.allowed_tools.is_empty() || self.allowed_tools.iter().any(|t| t == tool_id)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
