//! # agentcore Protocols
//!
//! Shared data model and collaborator traits for the agentcore execution core.
//! Contains only types and interface definitions - no process, registry or
//! scheduling logic.
//!
//! ## Collaborator Traits
//!
//! - [`CommandRunner`] - Runs an external process to completion
//! - [`SkillSource`] - Scans skill roots into [`Skill`] values
//! - [`SubagentExecutor`] - Drives one forked subagent to a result
//! - [`Tool`] - Thin tool adapters invoked on the agent's behalf

pub mod error;
pub mod exec;
pub mod skill;
pub mod subagent;
pub mod tool;
pub mod types;

pub use error::{ExecError, SecurityError, SkillError, SubagentError, ToolError};
pub use exec::{
    BackgroundSession, CommandRunner, ExecutionRequest, ExecutionResult, SessionOutput,
    SessionState, SessionStatus,
};
pub use skill::{CatalogEntry, RenderedSkill, Skill, SkillRoot, SkillScope, SkillSource};
pub use subagent::{
    ResourceLimits, SubagentContext, SubagentExecutor, SubagentResult, SubagentStatus,
};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::*;
