//! Background sessions.
//!
//! A session is launched, then observed by one monitor task that records
//! its terminal status exactly once. Readers only ever see snapshots taken
//! under the session map's lock.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use agentcore_protocols::error::ExecError;
use agentcore_protocols::exec::{
    BackgroundSession, ExecutionRequest, SessionOutput, SessionState, SessionStatus,
};

use crate::executor::{build_command, deadline, kill_process_group, launch_error, CommandExecutor};

/// How long the monitor waits for output pipes to drain once the process
/// has exited. A grandchild that left the process group can hold them open
/// indefinitely.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct OutputBuffers {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

pub(crate) struct Session {
    status: SessionStatus,
    output: Arc<Mutex<OutputBuffers>>,
    cancel: CancellationToken,
}

enum Outcome {
    Exited(i32),
    WaitFailed(String),
    TimedOut(Duration),
    Cancelled,
}

impl CommandExecutor {
    /// Launch `request` without waiting for it.
    ///
    /// Returns as soon as the process has been spawned. Must be called from
    /// within a Tokio runtime.
    pub fn execute_background(
        &self,
        request: ExecutionRequest,
    ) -> Result<BackgroundSession, ExecError> {
        let mut cmd = build_command(&request)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| launch_error(&request.command, e))?;

        let id = format!("bg-{}", Uuid::new_v4());
        let started_at = Utc::now();
        let output = Arc::new(Mutex::new(OutputBuffers::default()));
        let cancel = CancellationToken::new();

        let stdout = child
            .stdout
            .take()
            .map(|pipe| spawn_reader(pipe, output.clone(), false));
        let stderr = child
            .stderr
            .take()
            .map(|pipe| spawn_reader(pipe, output.clone(), true));

        let command = request.display_command();
        self.sessions.write().insert(
            id.clone(),
            Session {
                status: SessionStatus {
                    id: id.clone(),
                    command: command.clone(),
                    state: SessionState::Running,
                    started_at,
                    completed_at: None,
                    exit_code: None,
                    error: None,
                },
                output,
                cancel: cancel.clone(),
            },
        );
        info!("Started background session {}: {}", id, command);

        let sessions = self.sessions.clone();
        let session_id = id.clone();
        let timeout = request.timeout;
        tokio::spawn(async move {
            let outcome = tokio::spawn(monitor(child, cancel, timeout))
                .await
                .unwrap_or_else(|e| Outcome::WaitFailed(format!("monitor aborted: {}", e)));
            // A killed session is terminal as soon as the signal is sent. An
            // exited one becomes visible only once its output is complete.
            let killed = matches!(outcome, Outcome::TimedOut(_) | Outcome::Cancelled);
            if killed {
                finish(&sessions, &session_id, &outcome);
            }
            tokio::join!(drain(stdout, &session_id), drain(stderr, &session_id));
            if !killed {
                finish(&sessions, &session_id, &outcome);
            }
        });

        Ok(BackgroundSession { id, started_at })
    }

    pub fn get_session_status(&self, id: &str) -> Result<SessionStatus, ExecError> {
        self.sessions
            .read()
            .get(id)
            .map(|s| s.status.clone())
            .ok_or_else(|| ExecError::SessionNotFound(id.to_string()))
    }

    /// Output captured so far; partial while the session is running.
    pub fn get_session_output(&self, id: &str) -> Result<SessionOutput, ExecError> {
        let output = self
            .sessions
            .read()
            .get(id)
            .map(|s| s.output.clone())
            .ok_or_else(|| ExecError::SessionNotFound(id.to_string()))?;

        let buffers = output.lock();
        Ok(SessionOutput {
            stdout: String::from_utf8_lossy(&buffers.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&buffers.stderr).into_owned(),
        })
    }

    /// Signal the session's process and mark it cancelled.
    ///
    /// The status changes immediately, before the OS has reaped the process.
    /// Cancelling an already finished session leaves its status untouched.
    pub fn cancel_session(&self, id: &str) -> Result<SessionStatus, ExecError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ExecError::SessionNotFound(id.to_string()))?;

        if session.status.state == SessionState::Running {
            session.status.state = SessionState::Cancelled;
            session.status.completed_at = Some(Utc::now());
            session.cancel.cancel();
            info!("Cancelled background session {}", id);
        }
        Ok(session.status.clone())
    }

    /// Snapshots of every tracked session, oldest first.
    pub fn list_sessions(&self) -> Vec<SessionStatus> {
        let mut statuses: Vec<SessionStatus> = self
            .sessions
            .read()
            .values()
            .map(|s| s.status.clone())
            .collect();
        statuses.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        statuses
    }

    pub fn running_count(&self) -> usize {
        self.sessions
            .read()
            .values()
            .filter(|s| s.status.state == SessionState::Running)
            .count()
    }

    /// Evict terminal sessions that finished more than `max_age` ago.
    /// Running sessions are never evicted. Returns the number removed.
    pub fn purge_finished(&self, max_age: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| !expired(&s.status, now, max_age));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {} finished background sessions", purged);
        }
        purged
    }

    /// Cancel every running session.
    pub fn shutdown(&self) {
        let ids: Vec<String> = self
            .sessions
            .read()
            .iter()
            .filter(|(_, s)| s.status.state == SessionState::Running)
            .map(|(id, _)| id.clone())
            .collect();
        for id in ids {
            let _ = self.cancel_session(&id);
        }
    }
}

fn expired(status: &SessionStatus, now: DateTime<Utc>, max_age: Duration) -> bool {
    match (status.state.is_terminal(), status.completed_at) {
        (true, Some(completed_at)) => (now - completed_at)
            .to_std()
            .map(|age| age > max_age)
            .unwrap_or(false),
        _ => false,
    }
}

fn spawn_reader<R>(mut pipe: R, output: Arc<Mutex<OutputBuffers>>, stderr: bool) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = [0u8; 4096];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let mut buffers = output.lock();
                    let target = if stderr {
                        &mut buffers.stderr
                    } else {
                        &mut buffers.stdout
                    };
                    target.extend_from_slice(&chunk[..n]);
                }
            }
        }
    })
}

async fn drain(reader: Option<JoinHandle<()>>, id: &str) {
    let Some(reader) = reader else {
        return;
    };
    if tokio::time::timeout(DRAIN_TIMEOUT, reader).await.is_err() {
        warn!("Output of session {} did not drain", id);
    }
}

async fn monitor(mut child: Child, cancel: CancellationToken, timeout: Duration) -> Outcome {
    let pid = child.id();
    let outcome = tokio::select! {
        status = child.wait() => match status {
            Ok(status) => return Outcome::Exited(status.code().unwrap_or(-1)),
            Err(e) => return Outcome::WaitFailed(e.to_string()),
        },
        _ = cancel.cancelled() => Outcome::Cancelled,
        _ = deadline(timeout) => Outcome::TimedOut(timeout),
    };

    kill_process_group(pid);
    if let Err(e) = child.kill().await {
        warn!("Failed to kill background process: {}", e);
    }
    outcome
}

/// Record the terminal status. Only a running session transitions, so a
/// cancellation recorded earlier is never overwritten.
fn finish(sessions: &RwLock<HashMap<String, Session>>, id: &str, outcome: &Outcome) {
    let mut sessions = sessions.write();
    let Some(session) = sessions.get_mut(id) else {
        return;
    };
    let status = &mut session.status;
    if status.state != SessionState::Running {
        return;
    }

    status.completed_at = Some(Utc::now());
    match outcome {
        Outcome::Exited(code) => {
            status.state = SessionState::Completed;
            status.exit_code = Some(*code);
            info!("Background session {} exited with {}", id, code);
        }
        Outcome::WaitFailed(error) => {
            status.state = SessionState::Failed;
            warn!("Background session {} failed: {}", id, error);
            status.error = Some(error.clone());
        }
        Outcome::TimedOut(timeout) => {
            status.state = SessionState::Failed;
            status.error = Some(format!("timed out after {:?}", timeout));
            warn!("Background session {} timed out", id);
        }
        Outcome::Cancelled => {
            status.state = SessionState::Cancelled;
        }
    }
}

#[cfg(test)]
#[path = "background_tests.rs"]
mod tests;
