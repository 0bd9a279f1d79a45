//! Code tools for agentcore.
//!
//! - `repo_search`: ripgrep over the workspace, path-checked and redacted
//! - `coding_agent`: a coding CLI run under a PTY as a background session

mod coding_agent;
mod repo_search;

pub use coding_agent::CodingAgentTool;
pub use repo_search::RepoSearchTool;
