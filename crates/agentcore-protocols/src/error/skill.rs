//! Skill errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Skill not found: {0}")]
    NotFound(String),

    #[error("Skill loading failed: {0}")]
    LoadingFailed(String),

    #[error("Invalid skill definition: {0}")]
    InvalidDefinition(String),

    #[error("Skill parsing error: {0}")]
    ParsingError(String),
}
