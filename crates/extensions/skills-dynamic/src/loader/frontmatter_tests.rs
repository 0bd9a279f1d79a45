use super::*;

const SAMPLE_SKILL: &str = r#"---
name: review
description: Review a file for bugs
allowed-tools: [exec, repo_search]
user-invocable: true
disable-model-invocation: true
context: fork
priority: 250
rate-limit: 10/minute
owner: platform-team
---

# Review

Review $0 and report problems.
"#;

#[test]
fn test_parse_full_frontmatter() {
    let skill = parse_skill_file(SAMPLE_SKILL, "ignored", SkillScope::Project).unwrap();

    assert_eq!(skill.name, "review");
    assert_eq!(skill.description, "Review a file for bugs");
    assert_eq!(skill.scope, SkillScope::Project);
    assert_eq!(skill.priority, 250);
    assert_eq!(skill.allowed_tools, vec!["exec", "repo_search"]);
    assert!(skill.user_invocable);
    assert!(!skill.model_invocable);
    assert!(skill.fork_context);
    assert_eq!(skill.rate_limit.as_deref(), Some("10/minute"));
    assert_eq!(skill.metadata["owner"], "platform-team");
    assert_eq!(skill.body, "# Review\n\nReview $0 and report problems.");
}

#[test]
fn test_defaults() {
    let content = "---\ndescription: minimal\n---\nBody";
    let skill = parse_skill_file(content, "from-dir", SkillScope::User).unwrap();

    assert_eq!(skill.name, "from-dir");
    assert_eq!(skill.priority, SkillScope::User.priority());
    assert!(skill.allowed_tools.is_empty());
    assert!(skill.user_invocable);
    assert!(skill.model_invocable);
    assert!(!skill.fork_context);
    assert!(skill.rate_limit.is_none());
    assert_eq!(skill.body, "Body");
}

#[test]
fn test_empty_frontmatter() {
    let skill = parse_skill_file("---\n---\nJust a body", "bare", SkillScope::Plugin).unwrap();
    assert_eq!(skill.name, "bare");
    assert_eq!(skill.body, "Just a body");
}

#[test]
fn test_allowed_tools_as_string() {
    let content = "---\nallowed-tools: exec, repo_search  coding_agent\n---\nx";
    let skill = parse_skill_file(content, "s", SkillScope::User).unwrap();
    assert_eq!(skill.allowed_tools, vec!["exec", "repo_search", "coding_agent"]);
}

#[test]
fn test_body_keeps_placeholders_and_blocks() {
    let content = "---\nname: s\n---\nRun:\n!command\ngit status\n\nThen $ARGUMENTS and $$5";
    let skill = parse_skill_file(content, "s", SkillScope::User).unwrap();
    assert_eq!(skill.body, "Run:\n!command\ngit status\n\nThen $ARGUMENTS and $$5");
}

#[test]
fn test_missing_frontmatter() {
    let result = parse_skill_file("# Just markdown", "s", SkillScope::User);
    assert!(matches!(result, Err(SkillError::ParsingError(_))));
}

#[test]
fn test_unclosed_frontmatter() {
    let result = parse_skill_file("---\nname: s\nno end", "s", SkillScope::User);
    assert!(matches!(result, Err(SkillError::ParsingError(_))));
}

#[test]
fn test_invalid_yaml() {
    let result = parse_skill_file("---\nname: [unclosed\n---\nx", "s", SkillScope::User);
    assert!(matches!(result, Err(SkillError::ParsingError(_))));
}

#[test]
fn test_unknown_context() {
    let result = parse_skill_file("---\ncontext: detached\n---\nx", "s", SkillScope::User);
    assert!(matches!(result, Err(SkillError::InvalidDefinition(_))));
}
