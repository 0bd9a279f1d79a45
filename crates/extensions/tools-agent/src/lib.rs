//! Subagents for agentcore.
//!
//! - [`SubagentManager`]: identity, status storage and cancellation wiring
//!   for forked skill executions
//! - `subagent`: status, cancel and list actions for the model

mod manager;
mod tool;

pub use manager::{SubagentInfo, SubagentManager};
pub use tool::SubagentTool;
