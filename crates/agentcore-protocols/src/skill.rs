//! Skill data model.
//!
//! Skills are reusable prompt templates with metadata controlling who may
//! invoke them, which tools they may use, and whether they run forked.

use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SkillError;
use crate::types::Metadata;

/// Source scope of a skill. Later variants outrank earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillScope {
    Plugin,
    Project,
    User,
    Enterprise,
}

impl SkillScope {
    /// Fixed numeric priority of this scope (higher wins).
    pub fn priority(self) -> i32 {
        match self {
            SkillScope::Plugin => 50,
            SkillScope::Project => 100,
            SkillScope::User => 200,
            SkillScope::Enterprise => 300,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SkillScope::Plugin => "plugin",
            SkillScope::Project => "project",
            SkillScope::User => "user",
            SkillScope::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for SkillScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillScope {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plugin" => Ok(SkillScope::Plugin),
            "project" => Ok(SkillScope::Project),
            "user" => Ok(SkillScope::User),
            "enterprise" => Ok(SkillScope::Enterprise),
            other => Err(SkillError::InvalidDefinition(format!(
                "unknown skill scope: {}",
                other
            ))),
        }
    }
}

/// A registered skill. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Unique key within a priority tier.
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub scope: SkillScope,

    /// Starts as `scope.priority()`; stored separately so it can be overridden.
    pub priority: i32,

    /// Ordered tool allow-list. Empty means unrestricted.
    #[serde(default)]
    pub allowed_tools: Vec<String>,

    #[serde(default = "default_true")]
    pub user_invocable: bool,

    #[serde(default = "default_true")]
    pub model_invocable: bool,

    /// Run as a forked subagent instead of inline.
    #[serde(default)]
    pub fork_context: bool,

    /// Optional `<count>/<period>` rate limit for this skill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<String>,

    /// Template text with `$ARGUMENTS`, `$N`, `$$` and `!command` blocks.
    pub body: String,

    /// File the skill was scanned from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,

    #[serde(default)]
    pub metadata: Metadata,
}

fn default_true() -> bool {
    true
}

impl Skill {
    pub fn new(name: impl Into<String>, scope: SkillScope, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            scope,
            priority: scope.priority(),
            allowed_tools: Vec::new(),
            user_invocable: true,
            model_invocable: true,
            fork_context: false,
            rate_limit: None,
            body: body.into(),
            source_path: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_allowed_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fork_context(mut self, fork: bool) -> Self {
        self.fork_context = fork;
        self
    }

    pub fn with_rate_limit(mut self, spec: impl Into<String>) -> Self {
        self.rate_limit = Some(spec.into());
        self
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Check the invariants a skill must hold before registration.
    pub fn validate(&self) -> Result<(), SkillError> {
        if self.name.trim().is_empty() {
            return Err(SkillError::InvalidDefinition(
                "skill name must not be empty".to_string(),
            ));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(SkillError::InvalidDefinition(format!(
                "skill name must not contain whitespace: '{}'",
                self.name
            )));
        }
        if let Some(tool) = self.allowed_tools.iter().find(|t| t.trim().is_empty()) {
            return Err(SkillError::InvalidDefinition(format!(
                "skill '{}' lists an empty allowed tool: '{}'",
                self.name, tool
            )));
        }
        Ok(())
    }

    /// Lightweight listing entry for catalogs.
    pub fn catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            name: self.name.clone(),
            description: self.description.clone(),
            scope: self.scope,
            user_invocable: self.user_invocable,
            model_invocable: self.model_invocable,
            fork_context: self.fork_context,
        }
    }
}

/// A root directory to scan for skills, tagged with its scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRoot {
    pub path: PathBuf,
    pub scope: SkillScope,
}

impl SkillRoot {
    pub fn new(path: impl Into<PathBuf>, scope: SkillScope) -> Self {
        Self {
            path: path.into(),
            scope,
        }
    }
}

/// A skill rendered into a final prompt.
///
/// `allowed_tools` is an owned copy; restricting it never touches the
/// registered skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSkill {
    pub skill_name: String,
    pub prompt: String,
    pub allowed_tools: Vec<String>,
}

/// Catalog projection of a winning skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub description: String,
    pub scope: SkillScope,
    pub user_invocable: bool,
    pub model_invocable: bool,
    pub fork_context: bool,
}

/// Scans skill roots into skills. Called once per initialize or reload.
#[async_trait]
pub trait SkillSource: Send + Sync {
    async fn scan(&self, roots: &[SkillRoot]) -> Result<Vec<Skill>, SkillError>;
}

#[cfg(test)]
#[path = "skill_tests.rs"]
mod tests;
