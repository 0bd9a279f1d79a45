//! Tool protocol definitions.
//!
//! Tools are thin adapters the orchestration layer invokes on the agent's
//! behalf. They consume the command executor and the security guards.

mod context;
mod definition;
mod result;
mod traits;

pub use context::*;
pub use definition::*;
pub use result::*;
pub use traits::*;
