//! `exec` subcommand: run one command through the executor.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use agentcore_protocols::exec::ExecutionRequest;

use crate::app::App;

/// Run the command and return its exit code. Ctrl-C cancels it.
pub(crate) async fn handle_exec_command(
    app: &App,
    timeout: Option<u64>,
    pty: bool,
    command: Vec<String>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut parts = command.into_iter();
    let program = parts.next().ok_or("no command given")?;

    let timeout = timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| app.config.executor.default_timeout());
    let request = ExecutionRequest::new(program)
        .with_args(parts)
        .with_working_dir(&app.work_dir)
        .with_timeout(timeout)
        .with_pty(pty);
    info!("Running {}", request.display_command());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling command");
            on_signal.cancel();
        }
    });

    let result = app.executor.execute_with_cancel(request, cancel).await?;

    print!("{}", app.sanitizer.sanitize_output(&result.stdout));
    eprint!("{}", app.sanitizer.sanitize_output(&result.stderr));
    info!(
        "Command exited with {} after {:?}",
        result.exit_code, result.duration
    );

    Ok(result.exit_code)
}
