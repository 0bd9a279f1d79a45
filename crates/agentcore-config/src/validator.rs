//! Configuration validation.

use std::path::Path;

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const RATE_SPEC_PATTERN: &str = r"^[1-9][0-9]*/(second|minute|hour)$";

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_executor(config, &mut result);
        Self::validate_security(config, &mut result)?;
        Self::validate_skills(config, &mut result);
        Self::validate_subagents(config, &mut result);

        Ok(result)
    }

    fn validate_executor(config: &Config, result: &mut ValidationResult) {
        let executor = &config.executor;
        if executor.default_timeout_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "executor.default_timeout_secs",
                "default_timeout_secs is 0, commands will run without a timeout",
            ));
        }

        if executor.preprocess_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "executor.preprocess_timeout_secs",
                "preprocess_timeout_secs must be greater than 0",
            ));
        }

        if executor.max_output_bytes == 0 {
            result.add_error(ValidationError::new(
                "executor.max_output_bytes",
                "max_output_bytes must be greater than 0",
            ));
        }

        if executor.shell.trim().is_empty() {
            result.add_error(ValidationError::new(
                "executor.shell",
                "Shell cannot be empty",
            ));
        }
    }

    fn validate_security(
        config: &Config,
        result: &mut ValidationResult,
    ) -> Result<(), ConfigError> {
        let security = &config.security;
        if security.allowed_dirs.is_empty() {
            result.add_error(ValidationError::new(
                "security.allowed_dirs",
                "At least one allowed directory is required",
            ));
        }

        let rate_spec = Regex::new(RATE_SPEC_PATTERN)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        if !rate_spec.is_match(&security.default_rate_limit) {
            result.add_error(ValidationError::new(
                "security.default_rate_limit",
                format!(
                    "Invalid rate limit '{}', expected <count>/<second|minute|hour>",
                    security.default_rate_limit
                ),
            ));
        }

        for (i, pattern) in security.redaction_patterns.iter().enumerate() {
            if let Err(e) = Regex::new(pattern) {
                result.add_error(ValidationError::new(
                    format!("security.redaction_patterns[{}]", i),
                    format!("Invalid regex '{}': {}", pattern, e),
                ));
            }
        }

        Ok(())
    }

    fn validate_skills(config: &Config, result: &mut ValidationResult) {
        for root in config.skills.skill_roots() {
            if !Path::new(&root.path).exists() {
                result.add_warning(ValidationWarning::new(
                    "skills.roots",
                    format!("Skill root does not exist: {:?}", root.path),
                ));
            }
        }
    }

    fn validate_subagents(config: &Config, result: &mut ValidationResult) {
        let subagents = &config.subagents;
        if subagents.max_concurrent == 0 {
            result.add_error(ValidationError::new(
                "subagents.max_concurrent",
                "max_concurrent must be greater than 0",
            ));
        }

        if subagents.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "subagents.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }

        if subagents.retention_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "subagents.retention_secs",
                "retention_secs is 0, finished subagents are purged on the next sweep",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
