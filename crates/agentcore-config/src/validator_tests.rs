use super::*;
use crate::schema::SkillRootConfig;
use agentcore_protocols::SkillScope;

fn config_with_existing_root() -> (Config, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.skills.roots = vec![SkillRootConfig {
        path: dir.path().to_string_lossy().to_string(),
        scope: SkillScope::Project,
    }];
    (config, dir)
}

#[test]
fn test_validate_default_config() {
    let (config, _dir) = config_with_existing_root();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_malformed_rate_limit() {
    for spec in ["0/minute", "10/day", "ten/second", "10/Minute", "10"] {
        let mut config = Config::default();
        config.security.default_rate_limit = spec.to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid(), "{} should be rejected", spec);
        assert!(result
            .errors
            .iter()
            .any(|e| e.path == "security.default_rate_limit"));
    }
}

#[test]
fn test_validate_zero_max_concurrent() {
    let mut config = Config::default();
    config.subagents.max_concurrent = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "subagents.max_concurrent"));
}

#[test]
fn test_validate_empty_allowed_dirs() {
    let mut config = Config::default();
    config.security.allowed_dirs.clear();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "security.allowed_dirs"));
}

#[test]
fn test_validate_bad_redaction_pattern() {
    let mut config = Config::default();
    config.security.redaction_patterns = vec!["ok-[0-9]+".to_string(), "(unclosed".to_string()];

    let result = ConfigValidator::validate(&config).unwrap();
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "security.redaction_patterns[1]");
}

#[test]
fn test_zero_timeout_is_warning() {
    let (mut config, _dir) = config_with_existing_root();
    config.executor.default_timeout_secs = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "executor.default_timeout_secs"));
}

#[test]
fn test_missing_skill_root_is_warning() {
    let mut config = Config::default();
    config.skills.roots = vec![SkillRootConfig {
        path: "/nonexistent/agentcore/skills".to_string(),
        scope: SkillScope::User,
    }];

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "skills.roots"));
}

#[test]
fn test_into_result() {
    let mut config = Config::default();
    config.subagents.max_concurrent = 0;
    let err = ConfigValidator::validate(&config)
        .unwrap()
        .into_result()
        .unwrap_err();
    assert!(err.to_string().contains("subagents.max_concurrent"));

    let (config, _dir) = config_with_existing_root();
    let warnings = ConfigValidator::validate(&config)
        .unwrap()
        .into_result()
        .unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn test_validation_result_add() {
    let mut result = ValidationResult::default();
    assert!(result.is_valid());

    result.add_error(ValidationError::new("path", "msg"));
    assert!(!result.is_valid());

    result.add_warning(ValidationWarning::new("path", "warn"));
    assert_eq!(result.warnings.len(), 1);
}
