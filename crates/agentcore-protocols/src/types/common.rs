//! Common utility types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Open key/value bag attached to contexts and results.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Risk level for operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}
