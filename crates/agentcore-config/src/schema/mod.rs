//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use agentcore_protocols::{ResourceLimits, SkillRoot, SkillScope};
use serde::{Deserialize, Serialize};

use crate::loader::ConfigLoader;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub skills: SkillsConfig,

    #[serde(default)]
    pub subagents: SubagentsConfig,
}

/// Command executor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Timeout for `exec` calls. 0 disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,

    /// Cap applied to every inline `!command` block.
    #[serde(default = "default_preprocess_timeout_secs")]
    pub preprocess_timeout_secs: u64,

    /// Cap on captured output per inline command.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,

    #[serde(default = "default_shell")]
    pub shell: String,
}

impl ExecutorConfig {
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }

    pub fn preprocess_timeout(&self) -> Duration {
        Duration::from_secs(self.preprocess_timeout_secs)
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: default_timeout_secs(),
            preprocess_timeout_secs: default_preprocess_timeout_secs(),
            max_output_bytes: default_max_output_bytes(),
            shell: default_shell(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_preprocess_timeout_secs() -> u64 {
    30
}

fn default_max_output_bytes() -> usize {
    64 * 1024
}

fn default_shell() -> String {
    "sh".to_string()
}

/// Security guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Workspace roots that file and search tools may touch.
    #[serde(default = "default_allowed_dirs")]
    pub allowed_dirs: Vec<String>,

    /// Applied to skills without their own `rate-limit`.
    #[serde(default = "default_rate_limit")]
    pub default_rate_limit: String,

    /// Extra regexes appended to the built-in secret patterns.
    #[serde(default)]
    pub redaction_patterns: Vec<String>,
}

impl SecurityConfig {
    /// Allowed directories with `~` expanded.
    pub fn allowed_paths(&self) -> Vec<PathBuf> {
        self.allowed_dirs
            .iter()
            .map(|dir| PathBuf::from(ConfigLoader::expand_path(dir)))
            .collect()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_dirs: default_allowed_dirs(),
            default_rate_limit: default_rate_limit(),
            redaction_patterns: Vec::new(),
        }
    }
}

fn default_allowed_dirs() -> Vec<String> {
    vec![".".to_string()]
}

fn default_rate_limit() -> String {
    "30/minute".to_string()
}

/// One skill root as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRootConfig {
    pub path: String,
    pub scope: SkillScope,
}

/// Skills configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(default = "default_skill_roots")]
    pub roots: Vec<SkillRootConfig>,
}

impl SkillsConfig {
    /// Scan roots with `~` expanded, in configured order.
    pub fn skill_roots(&self) -> Vec<SkillRoot> {
        self.roots
            .iter()
            .map(|root| SkillRoot::new(ConfigLoader::expand_path(&root.path), root.scope))
            .collect()
    }
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            roots: default_skill_roots(),
        }
    }
}

fn default_skill_roots() -> Vec<SkillRootConfig> {
    vec![SkillRootConfig {
        path: "~/.agentcore/skills".to_string(),
        scope: SkillScope::User,
    }]
}

/// Subagent lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubagentsConfig {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// How long finished subagents and sessions stay queryable.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,
}

impl SubagentsConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn limits(&self) -> ResourceLimits {
        ResourceLimits {
            max_tokens: self.max_tokens,
            max_tool_calls: self.max_tool_calls,
        }
    }
}

impl Default for SubagentsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            retention_secs: default_retention_secs(),
            max_tokens: default_max_tokens(),
            max_tool_calls: default_max_tool_calls(),
        }
    }
}

fn default_max_concurrent() -> usize {
    10
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_max_tokens() -> u32 {
    100_000
}

fn default_max_tool_calls() -> u32 {
    50
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
