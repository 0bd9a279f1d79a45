//! Workspace path containment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use agentcore_protocols::error::SecurityError;

/// Accepts only paths that resolve inside one of the allowed directories.
#[derive(Debug, Clone)]
pub struct PathValidator {
    /// Absolute, canonical where the directory exists.
    allowed_dirs: Vec<PathBuf>,
}

impl PathValidator {
    /// Build a validator, canonicalizing every allowed directory up front.
    ///
    /// Directories that do not exist yet are made absolute instead.
    pub fn new<I, P>(allowed_dirs: I) -> Result<Self, SecurityError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let allowed_dirs = allowed_dirs
            .into_iter()
            .map(|dir| {
                let dir = dir.as_ref();
                std::fs::canonicalize(dir).or_else(|_| std::path::absolute(dir))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if allowed_dirs.is_empty() {
            return Err(SecurityError::NoAllowedDirs);
        }

        debug!("Path validator allows: {:?}", allowed_dirs);
        Ok(Self { allowed_dirs })
    }

    pub fn allowed_dirs(&self) -> &[PathBuf] {
        &self.allowed_dirs
    }

    /// Validate `path` and return its resolved absolute form.
    ///
    /// Any input containing `..` is rejected textually before resolution.
    /// Relative paths resolve against the first allowed directory.
    pub fn validate_path(&self, path: impl AsRef<Path>) -> Result<PathBuf, SecurityError> {
        let raw = path.as_ref();
        let text = raw.to_string_lossy();
        if text.contains("..") {
            warn!("Rejected path containing '..': {}", text);
            return Err(SecurityError::PathTraversal(text.into_owned()));
        }

        let candidate = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            self.allowed_dirs[0].join(raw)
        };
        let resolved = resolve(&candidate)?;

        if self.allowed_dirs.iter().any(|dir| resolved.starts_with(dir)) {
            Ok(resolved)
        } else {
            warn!("Rejected path outside workspace: {}", resolved.display());
            Err(SecurityError::OutsideWorkspace(resolved))
        }
    }

    pub fn is_allowed(&self, path: impl AsRef<Path>) -> bool {
        self.validate_path(path).is_ok()
    }
}

/// Canonicalize the deepest existing ancestor and re-append the rest, so
/// paths that do not exist yet (write targets) still resolve symlinks.
fn resolve(path: &Path) -> Result<PathBuf, SecurityError> {
    let mut existing = path;
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        if let Ok(base) = std::fs::canonicalize(existing) {
            let mut resolved = base;
            for part in missing.iter().rev() {
                resolved.push(part);
            }
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(std::path::absolute(path)?),
        }
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
