//! Process execution data model.
//!
//! A request describes one external process. Running it to completion goes
//! through [`CommandRunner`]; background sessions are owned by the executor
//! implementation and surfaced here only as read-only snapshots.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// A request to run one external process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionRequest {
    /// Program to launch.
    pub command: String,
    /// Arguments passed verbatim (no shell interpretation).
    pub args: Vec<String>,
    /// Working directory; inherits the caller's when `None`.
    pub working_dir: Option<PathBuf>,
    /// Extra environment variables layered over the inherited environment.
    pub env: HashMap<String, String>,
    /// Upper bound on run time. `Duration::ZERO` means no bound.
    pub timeout: Duration,
    /// Run under a pseudo-terminal for CLIs that refuse non-interactive use.
    pub pty: bool,
}

impl ExecutionRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Default::default()
        }
    }

    /// Run `script` through `shell -c`.
    pub fn shell(shell: impl Into<String>, script: impl Into<String>) -> Self {
        Self::new(shell).with_args(["-c".to_string(), script.into()])
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_pty(mut self, pty: bool) -> Self {
        self.pty = pty;
        self
    }

    /// Human-readable command line, for logs and status listings.
    pub fn display_command(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Outcome of a process that launched and exited.
///
/// A non-zero `exit_code` is data for the caller to interpret, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    pub duration: Duration,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Handle returned immediately when a background process is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
}

/// Lifecycle state of a background session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Running)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Failed => "failed",
            SessionState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Snapshot of a background session's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub id: String,
    pub command: String,
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output captured so far from a background session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs a process to completion.
///
/// Implemented by the command executor; consumed by the preprocessor and by
/// tool adapters so they can be tested against a scripted runner.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, ExecError>;
}
