//! Subagent data model.
//!
//! A subagent is a forked, independently cancellable execution of a skill.
//! Forking deep-copies the parent's history and tool list; nothing is shared.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::SubagentError;
use crate::skill::RenderedSkill;
use crate::types::{Message, Metadata};

/// Limits carried to the subagent executor, which is responsible for enforcing them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub max_tokens: u32,
    pub max_tool_calls: u32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_tokens: 100_000,
            max_tool_calls: 50,
        }
    }
}

/// Everything a subagent needs to run independently of its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubagentContext {
    /// Caller-supplied, unique among live subagents.
    pub id: String,
    pub parent_context_id: String,
    pub skill_name: String,
    pub allowed_tools: Vec<String>,
    pub limits: ResourceLimits,
    /// Owned copy of the parent's messages at fork time.
    pub conversation_history: Vec<Message>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl SubagentContext {
    /// Fork a context for `skill` from the parent's history.
    ///
    /// The rendered prompt is appended to the copied history as a user message.
    pub fn fork(
        id: impl Into<String>,
        parent_context_id: impl Into<String>,
        parent_history: &[Message],
        skill: &RenderedSkill,
        limits: ResourceLimits,
    ) -> Self {
        let mut conversation_history = parent_history.to_vec();
        conversation_history.push(Message::user(skill.prompt.clone()));

        Self {
            id: id.into(),
            parent_context_id: parent_context_id.into(),
            skill_name: skill.skill_name.clone(),
            allowed_tools: skill.allowed_tools.clone(),
            limits,
            conversation_history,
            created_at: Utc::now(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Status of a subagent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubagentStatus {
    Running,
    Complete,
    Cancelled,
    Failed,
}

impl SubagentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SubagentStatus::Running)
    }
}

impl std::fmt::Display for SubagentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubagentStatus::Running => "running",
            SubagentStatus::Complete => "complete",
            SubagentStatus::Cancelled => "cancelled",
            SubagentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Last known result of a subagent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubagentResult {
    pub subagent_id: String,
    pub status: SubagentStatus,
    #[serde(default)]
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SubagentResult {
    pub fn running(id: impl Into<String>) -> Self {
        Self {
            subagent_id: id.into(),
            status: SubagentStatus::Running,
            output: String::new(),
            error_message: None,
        }
    }

    pub fn complete(id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            subagent_id: id.into(),
            status: SubagentStatus::Complete,
            output: output.into(),
            error_message: None,
        }
    }

    pub fn cancelled(id: impl Into<String>) -> Self {
        Self {
            subagent_id: id.into(),
            status: SubagentStatus::Cancelled,
            output: String::new(),
            error_message: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            subagent_id: id.into(),
            status: SubagentStatus::Failed,
            output: String::new(),
            error_message: Some(error.into()),
        }
    }
}

/// Drives one subagent to a result: the LLM tool-use loop lives behind this.
///
/// Implementations must watch `cancel` and return a `Cancelled` result
/// promptly when it fires, rather than an error.
#[async_trait]
pub trait SubagentExecutor: Send + Sync {
    async fn execute(
        &self,
        cancel: CancellationToken,
        context: SubagentContext,
    ) -> Result<SubagentResult, SubagentError>;
}
