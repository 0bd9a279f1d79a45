//! Repository search tool backed by ripgrep.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use agentcore_protocols::error::{ExecError, ToolError};
use agentcore_protocols::exec::{CommandRunner, ExecutionRequest};
use agentcore_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use agentcore_protocols::types::RiskLevel;
use agentcore_security::{OutputSanitizer, PathValidator};

#[derive(Debug, Deserialize)]
struct SearchParams {
    /// Regex passed to ripgrep.
    pattern: String,
    /// File or directory to search, relative to the work dir.
    #[serde(default)]
    path: Option<String>,
    /// Glob filter, e.g. `*.rs`.
    #[serde(default)]
    glob: Option<String>,
    #[serde(default)]
    case_insensitive: bool,
    #[serde(default = "default_max_results")]
    max_results: usize,
}

fn default_max_results() -> usize {
    200
}

/// ripgrep's exit code when nothing matched.
const NO_MATCHES: i32 = 1;

pub struct RepoSearchTool {
    definition: ToolDefinition,
    runner: Arc<dyn CommandRunner>,
    program: String,
    timeout: Duration,
    paths: Option<Arc<PathValidator>>,
    sanitizer: Option<Arc<OutputSanitizer>>,
}

impl RepoSearchTool {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Regular expression to search for"
                },
                "path": {
                    "type": "string",
                    "description": "File or directory to search (default: working directory)"
                },
                "glob": {
                    "type": "string",
                    "description": "Only search files matching this glob"
                },
                "case_insensitive": {
                    "type": "boolean",
                    "description": "Ignore case"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum matching lines to return (default: 200)"
                }
            },
            "required": ["pattern"]
        });

        Self {
            definition: ToolDefinition::new(
                "repo_search",
                "Repository Search",
                "Search file contents in the repository with ripgrep",
            )
            .with_parameters_schema(schema)
            .with_risk_level(RiskLevel::Low),
            runner,
            program: "rg".to_string(),
            timeout: Duration::from_secs(30),
            paths: None,
            sanitizer: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_path_validator(mut self, paths: Arc<PathValidator>) -> Self {
        self.paths = Some(paths);
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<OutputSanitizer>) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    fn resolve_target(&self, path: Option<&str>, ctx: &ToolContext) -> Result<PathBuf, ToolError> {
        let target = match path {
            Some(p) => ctx.work_dir.join(p),
            None => ctx.work_dir.clone(),
        };
        match &self.paths {
            Some(paths) => Ok(paths.validate_path(&target)?),
            None => Ok(target),
        }
    }

    fn clean(&self, text: &str) -> String {
        match &self.sanitizer {
            Some(sanitizer) => sanitizer.sanitize_output(text),
            None => text.to_string(),
        }
    }

    fn build_request(
        &self,
        params: &SearchParams,
        target: PathBuf,
        ctx: &ToolContext,
    ) -> ExecutionRequest {
        let mut request = ExecutionRequest::new(&self.program)
            .with_args(["--line-number", "--no-heading", "--color", "never"])
            .with_working_dir(&ctx.work_dir)
            .with_timeout(self.timeout);
        if params.case_insensitive {
            request = request.with_arg("--ignore-case");
        }
        if let Some(glob) = &params.glob {
            request = request.with_arg("--glob").with_arg(glob);
        }
        request
            .with_arg("--")
            .with_arg(&params.pattern)
            .with_arg(target.to_string_lossy())
    }
}

#[async_trait]
impl Tool for RepoSearchTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError> {
        self.check_allowed(&ctx)?;
        let params: SearchParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        if params.pattern.is_empty() {
            return Err(ToolError::InvalidParameters("pattern must not be empty".into()));
        }

        let target = self.resolve_target(params.path.as_deref(), &ctx)?;
        debug!("Searching {:?} for '{}'", target, params.pattern);
        let request = self.build_request(&params, target, &ctx);

        let output = tokio::select! {
            result = self.runner.execute(request) => match result {
                Ok(output) => output,
                Err(ExecError::CommandNotFound(program)) => {
                    return Err(ToolError::ExecutionFailed(format!(
                        "{} is not installed; repo_search needs ripgrep", program
                    )));
                }
                Err(e) => return Err(e.into()),
            },
            _ = ctx.cancel.cancelled() => return Err(ExecError::Cancelled.into()),
        };

        if output.exit_code == NO_MATCHES {
            return Ok(ToolResult::success("No matches found")
                .with_metadata("match_count", serde_json::json!(0)));
        }
        if !output.success() {
            return Ok(ToolResult::error(format!(
                "ripgrep failed with exit code {}\n{}",
                output.exit_code,
                self.clean(&output.stderr)
            ))
            .with_metadata("exit_code", serde_json::json!(output.exit_code)));
        }

        let stdout = self.clean(&output.stdout);
        let lines: Vec<&str> = stdout.lines().collect();
        let total = lines.len();
        let mut content = lines
            .iter()
            .take(params.max_results)
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        let truncated = total > params.max_results;
        if truncated {
            content.push_str(&format!(
                "\n... {} more matches not shown",
                total - params.max_results
            ));
        }

        Ok(ToolResult::success(content)
            .with_metadata("match_count", serde_json::json!(total))
            .with_metadata("truncated", serde_json::json!(truncated)))
    }
}

#[cfg(test)]
#[path = "repo_search_tests.rs"]
mod tests;
