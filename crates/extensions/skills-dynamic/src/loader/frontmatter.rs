//! SKILL.md parser.
//!
//! ```markdown
//! ---
//! name: review
//! description: Review a file for bugs
//! allowed-tools: [exec, repo_search]
//! context: fork
//! rate-limit: 10/minute
//! ---
//!
//! Review $0 and report problems.
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use agentcore_protocols::error::SkillError;
use agentcore_protocols::skill::{Skill, SkillScope};

/// YAML frontmatter structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SkillFrontmatter {
    /// Defaults to the directory or file name.
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    description: String,

    #[serde(default)]
    allowed_tools: Option<ToolList>,

    #[serde(default = "default_true")]
    user_invocable: bool,

    #[serde(default)]
    disable_model_invocation: bool,

    /// `fork` to run as a subagent, `inline` (default) otherwise.
    #[serde(default)]
    context: Option<String>,

    /// Overrides the scope's priority.
    #[serde(default)]
    priority: Option<i32>,

    #[serde(default)]
    rate_limit: Option<String>,

    /// Additional metadata.
    #[serde(default, flatten)]
    extra: HashMap<String, serde_json::Value>,
}

/// `allowed-tools` as a YAML list or a comma/space separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ToolList {
    List(Vec<String>),
    Text(String),
}

impl ToolList {
    fn into_vec(self) -> Vec<String> {
        match self {
            ToolList::List(tools) => tools,
            ToolList::Text(text) => text
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Parse a skill file's content into a [`Skill`] of the given scope.
pub fn parse_skill_file(
    content: &str,
    default_name: &str,
    scope: SkillScope,
) -> Result<Skill, SkillError> {
    let (frontmatter_str, body) = extract_frontmatter(content)?;

    let yaml = if frontmatter_str.is_empty() {
        "{}"
    } else {
        frontmatter_str.as_str()
    };
    let fm: SkillFrontmatter = serde_yaml::from_str(yaml)
        .map_err(|e| SkillError::ParsingError(format!("Invalid frontmatter: {}", e)))?;

    let fork_context = match fm.context.as_deref() {
        None | Some("inline") => false,
        Some("fork") => true,
        Some(other) => {
            return Err(SkillError::InvalidDefinition(format!(
                "unknown context '{}': expected 'fork' or 'inline'",
                other
            )))
        }
    };

    let name = fm
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| default_name.to_string());

    let mut skill = Skill::new(name, scope, body)
        .with_description(fm.description)
        .with_fork_context(fork_context);
    skill.user_invocable = fm.user_invocable;
    skill.model_invocable = !fm.disable_model_invocation;
    if let Some(tools) = fm.allowed_tools {
        skill.allowed_tools = tools.into_vec();
    }
    if let Some(priority) = fm.priority {
        skill.priority = priority;
    }
    skill.rate_limit = fm.rate_limit;
    skill.metadata.extend(fm.extra);

    Ok(skill)
}

/// Split `---` delimited frontmatter from the markdown body.
fn extract_frontmatter(content: &str) -> Result<(String, String), SkillError> {
    let content = content.trim_start();

    if !content.starts_with("---") {
        return Err(SkillError::ParsingError(
            "SKILL.md must start with YAML frontmatter (---)".to_string(),
        ));
    }

    let after_first = &content[3..];
    let end_pos = after_first.find("\n---").ok_or_else(|| {
        SkillError::ParsingError("Missing closing frontmatter delimiter (---)".to_string())
    })?;

    let frontmatter = after_first[..end_pos].trim().to_string();
    let rest = &after_first[end_pos + 4..];
    // Drop the remainder of the closing delimiter line.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => "",
    };

    Ok((frontmatter, body.trim().to_string()))
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
