//! # agentcore Runtime
//!
//! Resolves a named skill, renders it and either returns the prompt inline
//! or hands it to a forked subagent.

mod error;
mod runtime;

pub use error::RuntimeError;
pub use runtime::{
    Invocation, InvocationRequest, Invoker, SkillRuntime, SkillRuntimeConfig,
};
