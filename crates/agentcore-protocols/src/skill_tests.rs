use super::*;

#[test]
fn test_scope_priorities_are_ordered() {
    assert!(SkillScope::Plugin.priority() < SkillScope::Project.priority());
    assert!(SkillScope::Project.priority() < SkillScope::User.priority());
    assert!(SkillScope::User.priority() < SkillScope::Enterprise.priority());
    assert_eq!(SkillScope::Project.priority(), 100);
    assert_eq!(SkillScope::User.priority(), 200);
}

#[test]
fn test_scope_from_str() {
    assert_eq!("User".parse::<SkillScope>().unwrap(), SkillScope::User);
    assert_eq!("plugin".parse::<SkillScope>().unwrap(), SkillScope::Plugin);
    assert!("global".parse::<SkillScope>().is_err());
}

#[test]
fn test_new_skill_derives_priority_from_scope() {
    let skill = Skill::new("review", SkillScope::Enterprise, "body");
    assert_eq!(skill.priority, 300);
    assert!(skill.user_invocable);
    assert!(skill.model_invocable);
    assert!(!skill.fork_context);
}

#[test]
fn test_priority_override() {
    let skill = Skill::new("review", SkillScope::Plugin, "body").with_priority(999);
    assert_eq!(skill.scope, SkillScope::Plugin);
    assert_eq!(skill.priority, 999);
}

#[test]
fn test_validate_rejects_empty_name() {
    let skill = Skill::new("  ", SkillScope::User, "body");
    assert!(matches!(skill.validate(), Err(SkillError::InvalidDefinition(_))));
}

#[test]
fn test_validate_rejects_whitespace_name() {
    let skill = Skill::new("code review", SkillScope::User, "body");
    assert!(skill.validate().is_err());
}

#[test]
fn test_validate_rejects_blank_tool() {
    let skill = Skill::new("review", SkillScope::User, "body").with_allowed_tools(["read", ""]);
    assert!(skill.validate().is_err());
}

#[test]
fn test_catalog_entry_projection() {
    let skill = Skill::new("review", SkillScope::Project, "body")
        .with_description("Review code")
        .with_fork_context(true);
    let entry = skill.catalog_entry();
    assert_eq!(entry.name, "review");
    assert_eq!(entry.description, "Review code");
    assert_eq!(entry.scope, SkillScope::Project);
    assert!(entry.fork_context);
}

#[test]
fn test_skill_deserialize_defaults() {
    let skill: Skill = serde_json::from_value(serde_json::json!({
        "name": "x",
        "scope": "user",
        "priority": 200,
        "body": "hi"
    }))
    .unwrap();
    assert!(skill.user_invocable);
    assert!(skill.model_invocable);
    assert!(skill.allowed_tools.is_empty());
}
