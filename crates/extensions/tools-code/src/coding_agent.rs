//! Coding agent tool: drives an interactive coding CLI in the background.
//!
//! Most coding CLIs refuse to run without a terminal, so sessions start in
//! PTY mode by default. Only sessions started by this tool are visible to it.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use regex::Regex;
use serde::Deserialize;
use tracing::info;

use agentcore_protocols::error::{ExecError, ToolError};
use agentcore_protocols::exec::{ExecutionRequest, SessionStatus};
use agentcore_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use agentcore_protocols::types::RiskLevel;
use agentcore_security::{OutputSanitizer, PathValidator};
use agentcore_tools_shell::CommandExecutor;

#[derive(Debug, Deserialize)]
struct CodingAgentParams {
    /// Action: start, status, output, cancel
    action: String,
    /// Task description handed to the CLI (for start)
    #[serde(default)]
    task: Option<String>,
    /// Working directory (for start)
    #[serde(default)]
    cwd: Option<String>,
    /// Timeout in milliseconds (for start)
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    session_id: Option<String>,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// CSI and OSC escape sequences emitted by terminal UIs.
static ANSI_ESCAPE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(\x07|\x1b\\)").ok()
});

pub struct CodingAgentTool {
    definition: ToolDefinition,
    executor: Arc<CommandExecutor>,
    program: String,
    args: Vec<String>,
    pty: bool,
    timeout: Duration,
    sessions: Mutex<HashSet<String>>,
    paths: Option<Arc<PathValidator>>,
    sanitizer: Option<Arc<OutputSanitizer>>,
}

impl CodingAgentTool {
    /// `program` is the coding CLI; the task is appended as its last argument.
    pub fn new(executor: Arc<CommandExecutor>, program: impl Into<String>) -> Self {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": ["start", "status", "output", "cancel"],
                    "description": "Action to perform"
                },
                "task": {
                    "type": "string",
                    "description": "Task for the coding agent (for start)"
                },
                "cwd": {
                    "type": "string",
                    "description": "Repository directory (for start)"
                },
                "timeout": {
                    "type": "integer",
                    "description": "Timeout in milliseconds (for start, default: 1800000)"
                },
                "session_id": {
                    "type": "string",
                    "description": "Session ID (for status, output, cancel)"
                }
            },
            "required": ["action"]
        });

        Self {
            definition: ToolDefinition::new(
                "coding_agent",
                "Coding Agent",
                "Run a coding agent CLI on a task in the background",
            )
            .with_parameters_schema(schema)
            .with_risk_level(RiskLevel::High),
            executor,
            program: program.into(),
            args: Vec::new(),
            pty: true,
            timeout: DEFAULT_TIMEOUT,
            sessions: Mutex::new(HashSet::new()),
            paths: None,
            sanitizer: None,
        }
    }

    /// Fixed arguments placed before the task.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pty(mut self, pty: bool) -> Self {
        self.pty = pty;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_path_validator(mut self, paths: Arc<PathValidator>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<OutputSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    fn own_session<'a>(&self, params: &'a CodingAgentParams) -> Result<&'a str, ToolError> {
        let id = params
            .session_id
            .as_deref()
            .ok_or_else(|| ToolError::InvalidParameters("session_id required".into()))?;
        if self.sessions.lock().contains(id) {
            Ok(id)
        } else {
            Err(ExecError::SessionNotFound(id.to_string()).into())
        }
    }

    fn resolve_cwd(&self, cwd: Option<&str>, ctx: &ToolContext) -> Result<PathBuf, ToolError> {
        let cwd = cwd.map(|c| ctx.work_dir.join(c)).unwrap_or_else(|| ctx.work_dir.clone());
        match &self.paths {
            Some(paths) => Ok(paths.validate_path(&cwd)?),
            None => Ok(cwd),
        }
    }

    fn clean(&self, text: &str) -> String {
        let plain = match ANSI_ESCAPE.as_ref() {
            Some(re) => re.replace_all(text, "").replace('\r', ""),
            None => text.replace('\r', ""),
        };
        match &self.sanitizer {
            Some(sanitizer) => sanitizer.sanitize_output(&plain),
            None => plain,
        }
    }

    fn status_result(status: &SessionStatus) -> ToolResult {
        let mut summary = format!("{} [{}", status.id, status.state);
        if let Some(code) = status.exit_code {
            summary.push_str(&format!(", exit code: {}", code));
        }
        if let Some(error) = &status.error {
            summary.push_str(&format!(", {}", error));
        }
        summary.push(']');
        ToolResult::success_json(summary, serde_json::to_value(status).unwrap_or_default())
    }
}

#[async_trait]
impl Tool for CodingAgentTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        self.check_allowed(&ctx)?;
        let params: CodingAgentParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;

        match params.action.as_str() {
            "start" => {
                let task = params
                    .task
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| ToolError::InvalidParameters("task required".into()))?;
                let cwd = self.resolve_cwd(params.cwd.as_deref(), &ctx)?;
                let timeout = params
                    .timeout
                    .map(Duration::from_millis)
                    .unwrap_or(self.timeout);

                let request = ExecutionRequest::new(&self.program)
                    .with_args(self.args.iter().cloned())
                    .with_arg(task)
                    .with_working_dir(cwd)
                    .with_timeout(timeout)
                    .with_pty(self.pty);

                let session = self.executor.execute_background(request)?;
                self.sessions.lock().insert(session.id.clone());
                info!("Coding agent session {} started ({})", session.id, self.program);

                Ok(ToolResult::success_json(
                    format!("Coding agent started: {}", session.id),
                    serde_json::json!({ "session_id": session.id }),
                ))
            }
            "status" => {
                let status = self.executor.get_session_status(self.own_session(&params)?)?;
                Ok(Self::status_result(&status))
            }
            "output" => {
                let output = self.executor.get_session_output(self.own_session(&params)?)?;
                let mut content = self.clean(&output.stdout);
                if !output.stderr.is_empty() {
                    if !content.is_empty() {
                        content.push_str("\n--- stderr ---\n");
                    }
                    content.push_str(&self.clean(&output.stderr));
                }
                Ok(ToolResult::success(content))
            }
            "cancel" => {
                let status = self.executor.cancel_session(self.own_session(&params)?)?;
                Ok(Self::status_result(&status))
            }
            other => Err(ToolError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "coding_agent_tests.rs"]
mod tests;
