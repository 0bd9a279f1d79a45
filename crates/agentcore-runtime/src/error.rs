//! Runtime errors.

use agentcore_protocols::error::{SecurityError, SkillError, SubagentError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Subagent(#[from] SubagentError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("Skill '{skill}' cannot be invoked by the {invoker}")]
    NotInvocable { skill: String, invoker: String },

    #[error("Rate limit exceeded for skill '{skill}' (user '{user}')")]
    RateLimited { skill: String, user: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_invocable_display() {
        let err = RuntimeError::NotInvocable {
            skill: "deploy".to_string(),
            invoker: "model".to_string(),
        };
        assert_eq!(err.to_string(), "Skill 'deploy' cannot be invoked by the model");
    }

    #[test]
    fn test_from_skill_error_is_transparent() {
        let err = RuntimeError::from(SkillError::NotFound("review".to_string()));
        assert_eq!(err.to_string(), "Skill not found: review");
    }
}
