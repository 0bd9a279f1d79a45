//! CLI definitions for agentcore.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// agentcore CLI.
#[derive(Parser)]
#[command(name = "agentcore")]
#[command(about = "Skills, command execution and tool adapters for LLM agents")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: config/default.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Skill commands
    Skill {
        #[command(subcommand)]
        action: SkillAction,
    },

    /// Run a command through the executor
    Exec {
        /// Timeout in seconds (default: executor.default_timeout_secs, 0 = none)
        #[arg(long)]
        timeout: Option<u64>,

        /// Run under a pseudo-terminal
        #[arg(long)]
        pty: bool,

        /// Command and arguments
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Tool adapter commands
    Tool {
        #[command(subcommand)]
        action: ToolAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum SkillAction {
    /// List the winning skill for every name
    List {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show a skill and every registration shadowed by it
    Show {
        name: String,
    },

    /// Preprocess and substitute a skill, then print the prompt
    Render {
        name: String,

        /// Skill arguments
        args: Vec<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ToolAction {
    /// List available tool adapters
    List,

    /// Run one tool adapter with JSON parameters
    Run {
        /// Tool ID
        id: String,

        /// Parameters as a JSON object
        #[arg(default_value = "{}")]
        params: String,
    },
}
