//! Background session management tool.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use agentcore_protocols::error::ToolError;
use agentcore_protocols::exec::{ExecutionRequest, SessionStatus};
use agentcore_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use agentcore_protocols::types::RiskLevel;

use crate::executor::CommandExecutor;

/// Parameters for background tool.
#[derive(Debug, Deserialize)]
struct BackgroundParams {
    /// Action: start, status, output, list, cancel
    action: String,
    /// Shell command to run (for start)
    #[serde(default)]
    command: Option<String>,
    /// Session ID (for status, output, cancel)
    #[serde(default)]
    session_id: Option<String>,
    /// Working directory (for start)
    #[serde(default)]
    cwd: Option<String>,
    /// Timeout in milliseconds (for start, default: none)
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    pty: bool,
}

impl BackgroundParams {
    fn require_session_id(&self) -> Result<&str, ToolError> {
        self.session_id
            .as_deref()
            .ok_or_else(|| ToolError::InvalidParameters("session_id required".into()))
    }
}

/// Background session management tool.
pub struct BackgroundTool {
    definition: ToolDefinition,
    executor: Arc<CommandExecutor>,
    shell: String,
}

impl BackgroundTool {
    pub fn new(executor: Arc<CommandExecutor>) -> Self {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["start", "status", "output", "list", "cancel"],
                    "description": "Action to perform"
                },
                "command": {
                    "type": "string",
                    "description": "Shell command to run in background (for start)"
                },
                "session_id": {
                    "type": "string",
                    "description": "Session ID (for status, output, cancel)"
                },
                "cwd": {
                    "type": "string",
                    "description": "Working directory (for start)"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in milliseconds (for start)"
                },
                "pty": {
                    "type": "boolean",
                    "description": "Run under a pseudo-terminal (for start)"
                }
            },
            "required": ["action"]
        });

        Self {
            definition: ToolDefinition::new(
                "background",
                "Background Session",
                "Manage background command sessions",
            )
            .with_parameters_schema(schema)
            .with_risk_level(RiskLevel::High),
            executor,
            shell: "sh".to_string(),
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    fn format_status(status: &SessionStatus) -> String {
        let mut line = format!("{}: {} [{}", status.id, status.command, status.state);
        if let Some(code) = status.exit_code {
            line.push_str(&format!(", exit code: {}", code));
        }
        if let Some(error) = &status.error {
            line.push_str(&format!(", {}", error));
        }
        line.push(']');
        line
    }

    fn status_result(status: &SessionStatus) -> ToolResult {
        ToolResult::success_json(
            Self::format_status(status),
            serde_json::to_value(status).unwrap_or_default(),
        )
    }
}

#[async_trait]
impl Tool for BackgroundTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        self.check_allowed(&ctx)?;
        let params: BackgroundParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        match params.action.as_str() {
            "start" => {
                let command = params
                    .command
                    .as_deref()
                    .ok_or_else(|| ToolError::InvalidParameters("command required".into()))?;

                let cwd = params
                    .cwd
                    .as_deref()
                    .map(std::path::PathBuf::from)
                    .unwrap_or_else(|| ctx.work_dir.clone());

                let mut request = ExecutionRequest::shell(&self.shell, command)
                    .with_working_dir(cwd)
                    .with_pty(params.pty);
                if let Some(ms) = params.timeout {
                    request = request.with_timeout(Duration::from_millis(ms));
                }

                let session = self.executor.execute_background(request)?;
                Ok(ToolResult::success_json(
                    format!("Background session started: {}", session.id),
                    serde_json::json!({ "session_id": session.id }),
                ))
            }
            "status" => {
                let status = self
                    .executor
                    .get_session_status(params.require_session_id()?)?;
                Ok(Self::status_result(&status))
            }
            "output" => {
                let output = self
                    .executor
                    .get_session_output(params.require_session_id()?)?;

                let mut content = output.stdout.clone();
                if !output.stderr.is_empty() {
                    if !content.is_empty() {
                        content.push_str("\n--- stderr ---\n");
                    }
                    content.push_str(&output.stderr);
                }
                Ok(ToolResult::success_json(
                    content,
                    serde_json::to_value(&output).unwrap_or_default(),
                ))
            }
            "list" => {
                let sessions = self.executor.list_sessions();
                if sessions.is_empty() {
                    Ok(ToolResult::success("No background sessions"))
                } else {
                    let list: Vec<String> = sessions.iter().map(Self::format_status).collect();
                    Ok(ToolResult::success(list.join("\n")))
                }
            }
            "cancel" => {
                let status = self
                    .executor
                    .cancel_session(params.require_session_id()?)?;
                Ok(Self::status_result(&status))
            }
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "background_tool_tests.rs"]
mod tests;
