//! # agentcore Config
//!
//! TOML configuration for the agentcore execution core: executor limits,
//! security guards, skill roots and subagent limits.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
