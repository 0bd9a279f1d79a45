use super::*;
use tempfile::TempDir;

fn sh(script: &str) -> ExecutionRequest {
    ExecutionRequest::shell("sh", script)
}

#[tokio::test]
async fn test_execute_echo() {
    let executor = CommandExecutor::new();
    let request = ExecutionRequest::new("echo")
        .with_arg("hi")
        .with_timeout(Duration::from_secs(5));

    let result = executor.execute(request).await.unwrap();
    assert!(result.stdout.contains("hi"));
    assert_eq!(result.exit_code, 0);
    assert!(result.success());
}

#[tokio::test]
async fn test_non_zero_exit_is_not_an_error() {
    let executor = CommandExecutor::new();
    let result = executor
        .execute(sh("echo oops >&2; exit 3").with_timeout(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(result.exit_code, 3);
    assert!(result.stderr.contains("oops"));
    assert!(!result.success());
}

#[tokio::test]
async fn test_timeout_is_an_error() {
    let executor = CommandExecutor::new();
    let started = Instant::now();
    let err = executor
        .execute(sh("sleep 5").with_timeout(Duration::from_millis(200)))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Timeout(_)));
    assert!(err.is_deadline());
    assert!(started.elapsed() < Duration::from_secs(4));
}

/// True once `pid` has exited (a zombie counts as exited).
#[cfg(target_os = "linux")]
async fn wait_exited(pid: &str) -> bool {
    for _ in 0..40 {
        match std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
            Err(_) => return true,
            Ok(stat) => {
                let state = stat.rsplit(')').next().and_then(|rest| rest.split_whitespace().next());
                if state == Some("Z") {
                    return true;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_timeout_kills_grandchildren() {
    let temp_dir = TempDir::new().unwrap();
    let pid_file = temp_dir.path().join("sleep.pid");
    let script = format!("sleep 10 & echo $! > {}; wait", pid_file.display());

    let executor = CommandExecutor::new();
    let err = executor
        .execute(sh(&script).with_timeout(Duration::from_millis(300)))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Timeout(_)));

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    assert!(wait_exited(pid.trim()).await, "sleep {} survived the timeout", pid.trim());
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_cancel_kills_grandchildren() {
    let temp_dir = TempDir::new().unwrap();
    let pid_file = temp_dir.path().join("sleep.pid");
    let script = format!("sleep 10 & echo $! > {}; wait", pid_file.display());

    let executor = CommandExecutor::new();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let err = executor
        .execute_with_cancel(sh(&script), cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Cancelled));

    let pid = std::fs::read_to_string(&pid_file).unwrap();
    assert!(wait_exited(pid.trim()).await, "sleep {} survived the cancel", pid.trim());
}

#[tokio::test]
async fn test_fast_command_within_timeout() {
    let executor = CommandExecutor::new();
    let result = executor
        .execute(sh("exit 7").with_timeout(Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(result.exit_code, 7);
}

#[tokio::test]
async fn test_zero_timeout_is_unbounded() {
    let executor = CommandExecutor::new();
    let result = executor.execute(sh("sleep 0.2; echo done")).await.unwrap();
    assert_eq!(result.stdout.trim(), "done");
}

#[tokio::test]
async fn test_command_not_found() {
    let executor = CommandExecutor::new();
    let err = executor
        .execute(ExecutionRequest::new("definitely-not-a-real-command-xyz"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::CommandNotFound(_)));
}

#[tokio::test]
async fn test_empty_command_rejected() {
    let executor = CommandExecutor::new();
    let err = executor.execute(ExecutionRequest::new("  ")).await.unwrap_err();
    assert!(matches!(err, ExecError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_missing_working_dir_rejected() {
    let executor = CommandExecutor::new();
    let err = executor
        .execute(ExecutionRequest::new("pwd").with_working_dir("/nonexistent_directory_xyz"))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_working_dir_and_env() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("marker.txt"), "x").unwrap();

    let executor = CommandExecutor::new();
    let result = executor
        .execute(
            sh("ls; echo \"$GREETING\"")
                .with_working_dir(temp_dir.path())
                .with_env("GREETING", "hello-env"),
        )
        .await
        .unwrap();
    assert!(result.stdout.contains("marker.txt"));
    assert!(result.stdout.contains("hello-env"));
}

#[tokio::test]
async fn test_args_are_not_shell_interpreted() {
    let executor = CommandExecutor::new();
    let result = executor
        .execute(ExecutionRequest::new("echo").with_arg("$HOME; rm -rf /"))
        .await
        .unwrap();
    assert_eq!(result.stdout.trim(), "$HOME; rm -rf /");
}

#[tokio::test]
async fn test_cancel_surfaces_as_deadline() {
    let executor = CommandExecutor::new();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = executor
        .execute_with_cancel(sh("sleep 5"), token)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Cancelled));
    assert!(err.is_deadline());
}

#[tokio::test]
async fn test_command_runner_trait() {
    let runner: Arc<dyn CommandRunner> = Arc::new(CommandExecutor::new());
    let result = runner.execute(sh("printf abc")).await.unwrap();
    assert_eq!(result.stdout, "abc");
}
