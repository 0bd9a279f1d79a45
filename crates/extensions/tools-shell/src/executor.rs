//! Command executor.
//!
//! Runs external processes either to completion ([`CommandExecutor::execute`])
//! or as tracked background sessions (see `background.rs`). A process that
//! launches and exits non-zero is a successful call; only launch failures,
//! timeouts and cancellation are errors.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use agentcore_protocols::error::ExecError;
use agentcore_protocols::exec::{CommandRunner, ExecutionRequest, ExecutionResult};

use crate::background::Session;
use crate::pty;

/// Runs processes and owns every background session it has launched.
pub struct CommandExecutor {
    pub(crate) sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl CommandExecutor {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Run `request` to completion, bounded by its timeout.
    pub async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        self.execute_with_cancel(request, CancellationToken::new())
            .await
    }

    /// Run `request` to completion unless `cancel` fires first.
    ///
    /// Cancellation kills the process and returns [`ExecError::Cancelled`],
    /// which callers can treat like a timeout via [`ExecError::is_deadline`].
    pub async fn execute_with_cancel(
        &self,
        request: ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<ExecutionResult, ExecError> {
        let timeout = request.timeout;
        let mut cmd = build_command(&request)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let command_line = request.display_command();
        debug!("Executing: {}", command_line);

        let started = Instant::now();
        let child = cmd
            .spawn()
            .map_err(|e| launch_error(&request.command, e))?;
        let pid = child.id();

        // The group kill reaches grandchildren; dropping the output future
        // then reaps the direct child through kill_on_drop.
        let output = child.wait_with_output();
        let output = tokio::select! {
            result = output => result?,
            _ = cancel.cancelled() => {
                kill_process_group(pid);
                debug!("Cancelled: {}", command_line);
                return Err(ExecError::Cancelled);
            }
            _ = deadline(timeout) => {
                kill_process_group(pid);
                warn!("Timed out after {:?}: {}", timeout, command_line);
                return Err(ExecError::Timeout(timeout));
            }
        };

        let exit_code = output.status.code().unwrap_or(-1);
        let duration = started.elapsed();
        debug!("Exited with {} in {:?}: {}", exit_code, duration, command_line);

        Ok(ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
            duration,
        })
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for CommandExecutor {
    async fn execute(&self, request: ExecutionRequest) -> Result<ExecutionResult, ExecError> {
        CommandExecutor::execute(self, request).await
    }
}

/// Build the OS command for `request`, applying PTY wrapping when asked.
pub(crate) fn build_command(request: &ExecutionRequest) -> Result<Command, ExecError> {
    if request.command.trim().is_empty() {
        return Err(ExecError::InvalidRequest("empty command".to_string()));
    }
    if let Some(dir) = &request.working_dir {
        // Otherwise spawn reports ENOENT, indistinguishable from a missing binary.
        if !dir.is_dir() {
            return Err(ExecError::InvalidRequest(format!(
                "working directory does not exist: {}",
                dir.display()
            )));
        }
    }

    let (program, args) = if request.pty {
        pty::wrap(&request.command, &request.args)?
    } else {
        (request.command.clone(), request.args.clone())
    };

    let mut std_cmd = std::process::Command::new(&program);
    std_cmd.args(&args).envs(&request.env);
    if let Some(dir) = &request.working_dir {
        std_cmd.current_dir(dir);
    }
    // Each command leads its own process group so a timeout or cancel can
    // signal everything it spawned.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        std_cmd.process_group(0);
    }

    let mut cmd = Command::from(std_cmd);
    cmd.kill_on_drop(true);
    Ok(cmd)
}

/// SIGKILL the process group led by `pid`.
#[cfg(unix)]
pub(crate) fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        debug!("Failed to kill process group {}: {}", pid, e);
    }
}

#[cfg(not(unix))]
pub(crate) fn kill_process_group(_pid: Option<u32>) {}

pub(crate) fn launch_error(command: &str, err: std::io::Error) -> ExecError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ExecError::CommandNotFound(command.to_string())
    } else {
        ExecError::LaunchFailed {
            command: command.to_string(),
            source: err,
        }
    }
}

/// Resolves after `timeout`, or never when it is zero.
pub(crate) async fn deadline(timeout: Duration) {
    if timeout.is_zero() {
        std::future::pending::<()>().await
    } else {
        tokio::time::sleep(timeout).await
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
