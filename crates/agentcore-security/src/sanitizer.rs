//! Regex-based redaction of credential-shaped text.

use parking_lot::RwLock;
use regex::Regex;
use tracing::debug;

use agentcore_protocols::error::SecurityError;

/// Replacement for every redacted match.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Built-in patterns, applied in this order before any added ones.
const DEFAULT_PATTERNS: &[&str] = &[
    // PEM private key blocks
    r"-----BEGIN [A-Z ]*PRIVATE KEY-----[\s\S]*?-----END [A-Z ]*PRIVATE KEY-----",
    // Anthropic / OpenAI style keys
    r"sk-[A-Za-z0-9_-]{20,}",
    // GitHub tokens
    r"gh[pousr]_[A-Za-z0-9]{36,}",
    r"github_pat_[A-Za-z0-9_]{20,}",
    // AWS access key ids
    r"AKIA[0-9A-Z]{16}",
    // Slack tokens
    r"xox[baprs]-[A-Za-z0-9-]{10,}",
    // Authorization headers
    r"(?i)bearer\s+[A-Za-z0-9._~+/-]+=*",
    // key = value assignments
    r#"(?i)(api[_-]?key|secret|password|passwd|token)\s*[:=]\s*["']?[^\s"']+["']?"#,
];

/// Applies an ordered list of patterns, replacing each match with
/// [`REDACTION_MARKER`].
pub struct OutputSanitizer {
    patterns: RwLock<Vec<Regex>>,
}

impl OutputSanitizer {
    /// Sanitizer loaded with the built-in credential patterns.
    pub fn new() -> Self {
        let patterns = DEFAULT_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self {
            patterns: RwLock::new(patterns),
        }
    }

    /// Sanitizer with no patterns at all.
    pub fn empty() -> Self {
        Self {
            patterns: RwLock::new(Vec::new()),
        }
    }

    /// Append a pattern after the existing ones.
    pub fn add_pattern(&self, pattern: &str) -> Result<(), SecurityError> {
        let regex = Regex::new(pattern)
            .map_err(|e| SecurityError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        debug!("Added redaction pattern: {}", pattern);
        self.patterns.write().push(regex);
        Ok(())
    }

    /// Builder form of [`add_pattern`](Self::add_pattern) for config-driven setup.
    pub fn with_patterns<I, S>(self, patterns: I) -> Result<Self, SecurityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.add_pattern(pattern.as_ref())?;
        }
        Ok(self)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.read().len()
    }

    /// Redact every match of every pattern, in order.
    pub fn sanitize_output(&self, text: &str) -> String {
        let patterns = self.patterns.read();
        let mut output = text.to_string();
        for regex in patterns.iter() {
            if regex.is_match(&output) {
                output = regex.replace_all(&output, REDACTION_MARKER).into_owned();
            }
        }
        output
    }
}

impl Default for OutputSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
