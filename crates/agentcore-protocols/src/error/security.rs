//! Security guard errors.
//!
//! These are resource-contention errors: reported synchronously, never
//! retried here. The caller decides whether to retry or reject.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Path traversal rejected: {0}")]
    PathTraversal(String),

    #[error("Path outside allowed directories: {}", .0.display())]
    OutsideWorkspace(PathBuf),

    #[error("No allowed directories configured")]
    NoAllowedDirs,

    #[error("Invalid rate limit spec '{0}': expected <count>/<second|minute|hour>")]
    InvalidRateSpec(String),

    #[error("Rate limit exceeded for skill '{skill}' (user '{user}')")]
    RateLimited { skill: String, user: String },

    #[error("Invalid redaction pattern: {0}")]
    InvalidPattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
