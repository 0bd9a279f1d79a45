//! Security guards consumed by the executor's callers and the tool adapters.
//!
//! - [`PathValidator`] - keeps file paths inside the configured workspace
//! - [`RateLimiter`] - per `(skill, user)` token buckets
//! - [`OutputSanitizer`] - redacts credential-shaped text from tool output

mod path;
mod rate_limit;
mod sanitizer;

pub use path::PathValidator;
pub use rate_limit::{RatePeriod, RateLimiter, RateSpec};
pub use sanitizer::{OutputSanitizer, REDACTION_MARKER};
