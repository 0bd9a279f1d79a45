//! Subagent tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use agentcore_protocols::error::ToolError;
use agentcore_protocols::subagent::SubagentResult;
use agentcore_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use agentcore_protocols::types::RiskLevel;

use crate::manager::SubagentManager;

#[derive(Debug, Deserialize)]
struct SubagentParams {
    /// Action: status, cancel, list
    action: String,
    #[serde(default)]
    subagent_id: Option<String>,
    /// For list: only subagents still running.
    #[serde(default)]
    running_only: bool,
}

impl SubagentParams {
    fn require_id(&self) -> Result<&str, ToolError> {
        self.subagent_id
            .as_deref()
            .ok_or_else(|| ToolError::InvalidParameters("subagent_id required".into()))
    }
}

/// Query and cancel forked subagents.
pub struct SubagentTool {
    definition: ToolDefinition,
    manager: Arc<SubagentManager>,
}

impl SubagentTool {
    pub fn new(manager: Arc<SubagentManager>) -> Self {
        let definition = ToolDefinition::new(
            "subagent",
            "Subagent",
            "Inspect forked subagents: query a subagent's status and output, \
             cancel it, or list subagents.",
        )
        .with_parameters_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["status", "cancel", "list"],
                    "description": "Action to perform"
                },
                "subagent_id": {
                    "type": "string",
                    "description": "Subagent ID (for status, cancel)"
                },
                "running_only": {
                    "type": "boolean",
                    "description": "List only running subagents (default: false)"
                }
            },
            "required": ["action"]
        }))
        .with_risk_level(RiskLevel::Medium);

        Self { definition, manager }
    }

    fn result_to_tool_result(result: &SubagentResult) -> ToolResult {
        let mut content = format!("{}: {}", result.subagent_id, result.status);
        if !result.output.is_empty() {
            content.push('\n');
            content.push_str(&result.output);
        }
        if let Some(error) = &result.error_message {
            content.push_str(&format!("\nerror: {}", error));
        }
        ToolResult::success_json(content, serde_json::to_value(result).unwrap_or_default())
    }
}

#[async_trait]
impl Tool for SubagentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        self.check_allowed(&ctx)?;
        let params: SubagentParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        match params.action.as_str() {
            "status" => {
                let result = self.manager.get_status(params.require_id()?)?;
                Ok(Self::result_to_tool_result(&result))
            }
            "cancel" => {
                let result = self.manager.cancel(params.require_id()?)?;
                Ok(Self::result_to_tool_result(&result))
            }
            "list" => {
                let infos: Vec<_> = self
                    .manager
                    .list()
                    .into_iter()
                    .filter(|info| !params.running_only || !info.result.status.is_terminal())
                    .collect();

                let content = if infos.is_empty() {
                    "No subagents".to_string()
                } else {
                    infos
                        .iter()
                        .map(|info| {
                            format!("{}: {} [{}]", info.id, info.skill_name, info.result.status)
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                Ok(ToolResult::success_json(
                    content,
                    serde_json::to_value(&infos).unwrap_or_default(),
                ))
            }
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
