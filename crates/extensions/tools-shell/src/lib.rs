//! Process execution for agentcore.
//!
//! This extension provides:
//! - [`CommandExecutor`]: synchronous runs and tracked background sessions
//! - `exec`: run a shell command to completion
//! - `background`: start, inspect and cancel background sessions

mod background;
mod background_tool;
mod exec;
mod executor;
mod pty;

pub use background_tool::BackgroundTool;
pub use exec::ExecTool;
pub use executor::CommandExecutor;
