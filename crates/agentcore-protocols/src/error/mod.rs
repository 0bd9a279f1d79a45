//! Error types shared across agentcore crates.

mod exec;
mod security;
mod skill;
mod subagent;
mod tool;

pub use exec::*;
pub use security::*;
pub use skill::*;
pub use subagent::*;
pub use tool::*;
