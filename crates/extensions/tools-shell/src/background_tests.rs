use super::*;

fn sh(script: &str) -> ExecutionRequest {
    ExecutionRequest::shell("sh", script)
}

async fn wait_terminal(executor: &CommandExecutor, id: &str) -> SessionStatus {
    for _ in 0..100 {
        let status = executor.get_session_status(id).unwrap();
        if status.state.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("session {} did not finish", id);
}

#[tokio::test]
async fn test_background_returns_immediately() {
    let executor = CommandExecutor::new();
    let started = std::time::Instant::now();
    let session = executor.execute_background(sh("sleep 2")).unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(session.id.starts_with("bg-"));

    let status = executor.get_session_status(&session.id).unwrap();
    assert_eq!(status.state, SessionState::Running);
    assert!(status.completed_at.is_none());
    executor.shutdown();
}

#[tokio::test]
async fn test_background_completes_with_exit_code() {
    let executor = CommandExecutor::new();
    let session = executor
        .execute_background(sh("echo out; echo err >&2; exit 4"))
        .unwrap();

    let status = wait_terminal(&executor, &session.id).await;
    assert_eq!(status.state, SessionState::Completed);
    assert_eq!(status.exit_code, Some(4));
    assert!(status.completed_at.is_some());

    let output = executor.get_session_output(&session.id).unwrap();
    assert_eq!(output.stdout.trim(), "out");
    assert_eq!(output.stderr.trim(), "err");
}

#[tokio::test]
async fn test_partial_output_while_running() {
    let executor = CommandExecutor::new();
    let session = executor
        .execute_background(sh("echo first; sleep 5; echo second"))
        .unwrap();

    let mut seen = false;
    for _ in 0..40 {
        if executor.get_session_output(&session.id).unwrap().stdout.contains("first") {
            seen = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(seen);
    assert_eq!(
        executor.get_session_status(&session.id).unwrap().state,
        SessionState::Running
    );
    executor.shutdown();
}

#[tokio::test]
async fn test_cancel_marks_cancelled_immediately() {
    let executor = CommandExecutor::new();
    let session = executor.execute_background(sh("sleep 10")).unwrap();

    let status = executor.cancel_session(&session.id).unwrap();
    assert_eq!(status.state, SessionState::Cancelled);
    assert!(status.completed_at.is_some());

    // The monitor must not overwrite the cancellation once the kill lands.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let status = executor.get_session_status(&session.id).unwrap();
    assert_eq!(status.state, SessionState::Cancelled);
    assert_eq!(status.exit_code, None);
}

#[tokio::test]
async fn test_cancel_finished_session_keeps_status() {
    let executor = CommandExecutor::new();
    let session = executor.execute_background(sh("exit 0")).unwrap();
    wait_terminal(&executor, &session.id).await;

    let status = executor.cancel_session(&session.id).unwrap();
    assert_eq!(status.state, SessionState::Completed);
}

#[tokio::test]
async fn test_background_timeout_fails_session() {
    let executor = CommandExecutor::new();
    let started = std::time::Instant::now();
    let session = executor
        .execute_background(sh("sleep 10").with_timeout(Duration::from_millis(200)))
        .unwrap();

    let status = wait_terminal(&executor, &session.id).await;
    assert_eq!(status.state, SessionState::Failed);
    assert!(status.error.unwrap().contains("timed out"));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_background_timeout_kills_grandchildren() {
    // The shell forks `sleep`, which inherits the output pipes.
    let executor = CommandExecutor::new();
    let started = std::time::Instant::now();
    let session = executor
        .execute_background(sh("sleep 10; echo unreachable").with_timeout(Duration::from_millis(200)))
        .unwrap();

    wait_terminal(&executor, &session.id).await;
    assert!(started.elapsed() < Duration::from_secs(2));

    // Once the group is gone the pipes close and output stops growing.
    tokio::time::sleep(Duration::from_millis(300)).await;
    let output = executor.get_session_output(&session.id).unwrap();
    assert!(!output.stdout.contains("unreachable"));
}

#[tokio::test]
async fn test_unknown_session() {
    let executor = CommandExecutor::new();
    assert!(matches!(
        executor.get_session_status("bg-missing"),
        Err(ExecError::SessionNotFound(_))
    ));
    assert!(matches!(
        executor.get_session_output("bg-missing"),
        Err(ExecError::SessionNotFound(_))
    ));
    assert!(matches!(
        executor.cancel_session("bg-missing"),
        Err(ExecError::SessionNotFound(_))
    ));
}

#[tokio::test]
async fn test_background_launch_failure() {
    let executor = CommandExecutor::new();
    let err = executor
        .execute_background(ExecutionRequest::new("definitely-not-a-real-command-xyz"))
        .unwrap_err();
    assert!(matches!(err, ExecError::CommandNotFound(_)));
    assert!(executor.list_sessions().is_empty());
}

#[tokio::test]
async fn test_list_and_running_count() {
    let executor = CommandExecutor::new();
    let long = executor.execute_background(sh("sleep 10")).unwrap();
    let short = executor.execute_background(sh("exit 0")).unwrap();
    wait_terminal(&executor, &short.id).await;

    let sessions = executor.list_sessions();
    assert_eq!(sessions.len(), 2);
    assert_eq!(executor.running_count(), 1);

    executor.cancel_session(&long.id).unwrap();
    assert_eq!(executor.running_count(), 0);
}

#[tokio::test]
async fn test_purge_finished_keeps_running() {
    let executor = CommandExecutor::new();
    let running = executor.execute_background(sh("sleep 10")).unwrap();
    let done = executor.execute_background(sh("exit 0")).unwrap();
    wait_terminal(&executor, &done.id).await;

    // Nothing is old enough under the default retention.
    assert_eq!(executor.purge_finished(Duration::from_secs(3600)), 0);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(executor.purge_finished(Duration::from_millis(1)), 1);
    assert!(executor.get_session_status(&done.id).is_err());
    assert!(executor.get_session_status(&running.id).is_ok());
    executor.shutdown();
}

#[tokio::test]
async fn test_concurrent_status_reads() {
    let executor = Arc::new(CommandExecutor::new());
    let session = executor.execute_background(sh("sleep 0.3")).unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let executor = executor.clone();
        let id = session.id.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..20 {
                executor.get_session_status(&id).unwrap();
                executor.get_session_output(&id).unwrap();
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    let status = wait_terminal(&executor, &session.id).await;
    assert_eq!(status.state, SessionState::Completed);
}
