//! Tool execution result types.

use serde::{Deserialize, Serialize};

use crate::types::Metadata;

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the call succeeded.
    pub success: bool,

    /// Text handed back to the agent.
    pub content: String,

    /// Machine-readable output, when the tool has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<serde_json::Value>,

    /// Error message when the call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Extra facts about the run, such as exit codes or match counts.
    #[serde(default)]
    pub metadata: Metadata,
}

impl ToolResult {
    /// Successful result with text content.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            structured_output: None,
            error: None,
            metadata: Metadata::new(),
        }
    }

    /// Successful result carrying structured output as well.
    pub fn success_json(content: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            structured_output: Some(output),
            ..Self::success(content)
        }
    }

    /// A completed call whose outcome the agent should read as a failure.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            structured_output: None,
            error: Some(error.into()),
            metadata: Metadata::new(),
        }
    }

    /// Attach one metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
