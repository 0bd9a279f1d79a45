//! Filesystem skill scanner.
//!
//! Each root is walked to a depth of two. A skill is either a directory
//! holding `SKILL.md` (name defaults to the directory name) or a single
//! `<name>.md` file directly under the root. Files that fail to parse are
//! logged and skipped; a missing root contributes nothing.

mod frontmatter;

pub use frontmatter::parse_skill_file;

use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use agentcore_protocols::error::SkillError;
use agentcore_protocols::skill::{Skill, SkillRoot, SkillScope, SkillSource};

/// File that marks a directory skill.
const SKILL_FILE: &str = "SKILL.md";

/// Scans skill roots on the local filesystem.
#[derive(Debug, Clone)]
pub struct FilesystemSkillSource {
    /// Maximum directory depth for skill discovery.
    max_depth: usize,
}

impl FilesystemSkillSource {
    pub fn new() -> Self {
        Self { max_depth: 2 }
    }

    /// Load every valid skill under `dir`, tagged with `scope`.
    pub fn load_from_directory(&self, dir: &Path, scope: SkillScope) -> Vec<Skill> {
        let mut skills = Vec::new();

        if !dir.is_dir() {
            debug!("Skills directory does not exist: {}", dir.display());
            return skills;
        }

        for entry in WalkDir::new(dir)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(default_name) = skill_name_for(path, entry.depth()) else {
                continue;
            };

            match self.load_file(path, &default_name, scope) {
                Ok(skill) => {
                    debug!("Loaded skill '{}' from {}", skill.name, path.display());
                    skills.push(skill);
                }
                Err(e) => warn!("Skipping skill {}: {}", path.display(), e),
            }
        }

        debug!("Loaded {} skills from {}", skills.len(), dir.display());
        skills
    }

    fn load_file(
        &self,
        path: &Path,
        default_name: &str,
        scope: SkillScope,
    ) -> Result<Skill, SkillError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SkillError::LoadingFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let skill = parse_skill_file(&content, default_name, scope)?
            .with_source_path(path);
        skill.validate()?;
        Ok(skill)
    }
}

impl Default for FilesystemSkillSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Default skill name for a file at `depth` below its root, or `None` when
/// the file is not a skill file.
fn skill_name_for(path: &Path, depth: usize) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name == SKILL_FILE {
        // root/<name>/SKILL.md
        if depth != 2 {
            return None;
        }
        return Some(path.parent()?.file_name()?.to_str()?.to_string());
    }
    if depth == 1 && path.extension()?.to_str()? == "md" {
        return Some(path.file_stem()?.to_str()?.to_string());
    }
    None
}

#[async_trait]
impl SkillSource for FilesystemSkillSource {
    async fn scan(&self, roots: &[SkillRoot]) -> Result<Vec<Skill>, SkillError> {
        let source = self.clone();
        let roots = roots.to_vec();
        let skills = tokio::task::spawn_blocking(move || {
            roots
                .iter()
                .flat_map(|root| source.load_from_directory(&root.path, root.scope))
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| SkillError::LoadingFailed(format!("Skill scan aborted: {}", e)))?;

        info!("Scanned {} skills", skills.len());
        Ok(skills)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
