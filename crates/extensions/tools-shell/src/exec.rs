//! Shell command execution tool.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use agentcore_protocols::error::{ExecError, ToolError};
use agentcore_protocols::exec::{CommandRunner, ExecutionRequest};
use agentcore_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use agentcore_protocols::types::RiskLevel;
use agentcore_security::{OutputSanitizer, PathValidator};

/// Parameters for exec tool.
#[derive(Debug, Deserialize)]
struct ExecParams {
    /// Shell command to execute.
    command: String,
    /// Timeout in milliseconds; the tool's default when absent.
    #[serde(default)]
    timeout: Option<u64>,
    /// Working directory (optional).
    #[serde(default)]
    cwd: Option<String>,
    #[serde(default)]
    pty: bool,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Shell command execution tool.
pub struct ExecTool {
    definition: ToolDefinition,
    runner: Arc<dyn CommandRunner>,
    shell: String,
    default_timeout: Duration,
    paths: Option<Arc<PathValidator>>,
    sanitizer: Option<Arc<OutputSanitizer>>,
}

impl ExecTool {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Shell command to execute"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in milliseconds (default: 120000, 0 = none)"
                },
                "cwd": {
                    "type": "string",
                    "description": "Working directory for the command"
                },
                "pty": {
                    "type": "boolean",
                    "description": "Run under a pseudo-terminal"
                }
            },
            "required": ["command"]
        });

        Self {
            definition: ToolDefinition::new(
                "exec",
                "Execute Command",
                "Execute a shell command",
            )
            .with_parameters_schema(schema)
            .with_risk_level(RiskLevel::High),
            runner,
            shell: "sh".to_string(),
            default_timeout: DEFAULT_TIMEOUT,
            paths: None,
            sanitizer: None,
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Restrict working directories to the validator's allowed dirs.
    pub fn with_path_validator(mut self, paths: Arc<PathValidator>) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Redact secrets from command output.
    pub fn with_sanitizer(mut self, sanitizer: Arc<OutputSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    fn resolve_cwd(&self, cwd: Option<String>, ctx: &ToolContext) -> Result<PathBuf, ToolError> {
        let cwd = cwd.map(PathBuf::from).unwrap_or_else(|| ctx.work_dir.clone());
        match &self.paths {
            Some(paths) => Ok(paths.validate_path(&cwd)?),
            None => Ok(cwd),
        }
    }

    fn clean(&self, text: &str) -> String {
        match &self.sanitizer {
            Some(sanitizer) => sanitizer.sanitize_output(text),
            None => text.to_string(),
        }
    }
}

#[async_trait]
impl Tool for ExecTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        self.check_allowed(&ctx)?;
        let params: ExecParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        let cwd = self.resolve_cwd(params.cwd, &ctx)?;
        let timeout = params
            .timeout
            .map(Duration::from_millis)
            .unwrap_or(self.default_timeout);

        let request = ExecutionRequest::shell(&self.shell, &params.command)
            .with_working_dir(cwd)
            .with_timeout(timeout)
            .with_pty(params.pty);

        let output = tokio::select! {
            result = self.runner.execute(request) => result?,
            _ = ctx.cancel.cancelled() => return Err(ExecError::Cancelled.into()),
        };

        let stdout = self.clean(&output.stdout);
        let stderr = self.clean(&output.stderr);

        let mut result = String::new();

        if !stdout.is_empty() {
            result.push_str(&stdout);
        }

        if !stderr.is_empty() {
            if !result.is_empty() {
                result.push_str("\n--- stderr ---\n");
            }
            result.push_str(&stderr);
        }

        let exit_code = serde_json::json!(output.exit_code);
        if output.success() {
            Ok(ToolResult::success(result).with_metadata("exit_code", exit_code))
        } else {
            Ok(ToolResult::error(format!(
                "Command failed with exit code {}\n{}",
                output.exit_code, result
            ))
            .with_metadata("exit_code", exit_code))
        }
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
