//! agentcore - execution core for LLM agents
//!
//! Main entry point for the agentcore CLI.

mod app;
mod cli;
mod cmd_exec;
mod cmd_skill;
mod cmd_tool;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use agentcore_config::{ConfigLoader, ConfigValidator};

use crate::app::App;
use crate::cli::{Cli, Commands};

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so rendered prompts and command output
/// on stdout stay clean.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = ConfigLoader::data_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("agentcore")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the file writer alive for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    let work_dir = match cli.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    for warning in ConfigValidator::validate(&config)?.into_result()? {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    info!("agentcore v{} in {}", env!("CARGO_PKG_VERSION"), work_dir.display());

    let app = App::new(config, work_dir)?;

    match cli.command {
        Commands::Skill { action } => cmd_skill::handle_skill_command(&app, action).await,
        Commands::Tool { action } => cmd_tool::handle_tool_command(&app, action).await,
        Commands::Exec { timeout, pty, command } => {
            let code = cmd_exec::handle_exec_command(&app, timeout, pty, command).await?;
            app.executor.shutdown();
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
    }
}
