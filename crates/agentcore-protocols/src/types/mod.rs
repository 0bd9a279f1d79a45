//! Common types used across agentcore crates.

mod common;
mod message;

pub use common::*;
pub use message::*;
