//! Skills for agentcore.
//!
//! # Features
//!
//! - **Scoped registry**: same-named skills from several roots resolve by
//!   priority (plugin < project < user < enterprise)
//! - **SKILL.md format**: markdown body with YAML frontmatter
//! - **Rendering**: `$ARGUMENTS`, `$0..$N` and `$$` placeholders
//! - **Preprocessing**: inline `!command` blocks replaced by their output

mod loader;
mod preprocess;
mod registry;
mod render;

pub use loader::{parse_skill_file, FilesystemSkillSource};
pub use preprocess::{Preprocessor, COMMAND_MARKER, TRUNCATION_MARKER};
pub use registry::SkillRegistry;
pub use render::substitute_arguments;

/// Re-export common types from protocols.
pub use agentcore_protocols::skill::{CatalogEntry, RenderedSkill, Skill, SkillRoot, SkillScope};
