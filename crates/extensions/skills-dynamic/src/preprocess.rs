//! Inline command preprocessing.
//!
//! A line consisting solely of [`COMMAND_MARKER`] opens a command block. The
//! following lines, up to the next blank line or the end of the body, are
//! joined and run as one shell script. The block is replaced by a fenced
//! block holding the script's stdout, or by a single `ERROR:` line when the
//! script cannot run or exits non-zero. Blocks do not nest.
//!
//! Preprocessing never fails a render.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use agentcore_protocols::exec::{CommandRunner, ExecutionRequest};
use agentcore_protocols::skill::{RenderedSkill, Skill};

use crate::render::substitute_arguments;

/// Line that opens an inline command block.
pub const COMMAND_MARKER: &str = "!command";

/// Appended when captured output exceeds the byte cap.
pub const TRUNCATION_MARKER: &str = "[truncated]";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_OUTPUT: usize = 64 * 1024;

/// Expands command blocks, then substitutes arguments.
pub struct Preprocessor {
    runner: Arc<dyn CommandRunner>,
    shell: String,
    timeout: Duration,
    max_output_bytes: usize,
    working_dir: Option<PathBuf>,
}

impl Preprocessor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            shell: "sh".to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT,
            working_dir: None,
        }
    }

    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Fixed upper bound for every command block.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_output_bytes(mut self, max: usize) -> Self {
        self.max_output_bytes = max;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Replace every command block in `body` with its output.
    pub async fn expand(&self, body: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut lines = body.lines().peekable();

        while let Some(line) = lines.next() {
            if line != COMMAND_MARKER {
                out.push(line.to_string());
                continue;
            }

            let mut block = Vec::new();
            while let Some(next) = lines.peek() {
                if next.trim().is_empty() {
                    break;
                }
                block.push(*next);
                lines.next();
            }

            if block.is_empty() {
                // Nothing to run; keep the marker as written.
                out.push(line.to_string());
            } else {
                out.push(self.run_block(&block.join("\n")).await);
            }
        }

        let mut expanded = out.join("\n");
        if body.ends_with('\n') {
            expanded.push('\n');
        }
        expanded
    }

    /// Expand command blocks, then substitute `args` over the result.
    pub async fn render(&self, skill: &Skill, args: &[String]) -> RenderedSkill {
        let expanded = self.expand(&skill.body).await;
        RenderedSkill {
            skill_name: skill.name.clone(),
            prompt: substitute_arguments(&expanded, args),
            allowed_tools: skill.allowed_tools.clone(),
        }
    }

    async fn run_block(&self, script: &str) -> String {
        let mut request = ExecutionRequest::shell(&self.shell, script).with_timeout(self.timeout);
        if let Some(dir) = &self.working_dir {
            request = request.with_working_dir(dir);
        }

        debug!("Preprocessing command block: {}", script);
        match self.runner.execute(request).await {
            Ok(result) if result.success() => {
                let output = truncate_output(result.stdout.trim_end(), self.max_output_bytes);
                format!("```\n{}\n```", output)
            }
            Ok(result) => {
                let diagnostic = if result.stderr.trim().is_empty() {
                    result.stdout.trim()
                } else {
                    result.stderr.trim()
                };
                warn!("Command block exited with {}: {}", result.exit_code, script);
                format!(
                    "ERROR: exit code {}: {}",
                    result.exit_code,
                    truncate_output(diagnostic, self.max_output_bytes)
                )
            }
            Err(e) => {
                warn!("Command block failed: {}: {}", script, e);
                format!("ERROR: {}", e)
            }
        }
    }
}

/// Cap `text` at `max` bytes on a char boundary.
fn truncate_output(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n{}", &text[..end], TRUNCATION_MARKER)
}

#[cfg(test)]
#[path = "preprocess_tests.rs"]
mod tests;
