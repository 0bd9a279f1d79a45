//! Skill registry with scope-priority resolution.
//!
//! Every registration is retained for auditing, but lookups and listings
//! only ever see one winner per name: the registration with the highest
//! priority. On a tie the earlier registration keeps its place.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use agentcore_protocols::error::SkillError;
use agentcore_protocols::skill::{CatalogEntry, Skill, SkillRoot, SkillSource};

#[derive(Default)]
struct RegistryState {
    /// Winning skill per name.
    winners: HashMap<String, Skill>,
    /// Every accepted registration, in order.
    all: Vec<Skill>,
}

/// Thread-safe skill registry.
pub struct SkillRegistry {
    state: RwLock<RegistryState>,
}

impl SkillRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Validate and register a skill.
    pub fn register(&self, skill: Skill) -> Result<(), SkillError> {
        skill.validate()?;

        let mut state = self.state.write();
        state.all.push(skill.clone());

        let replace = match state.winners.get(&skill.name) {
            Some(existing) if existing.priority >= skill.priority => {
                debug!(
                    "Skill '{}' ({}, {}) shadowed by existing ({}, {})",
                    skill.name, skill.scope, skill.priority, existing.scope, existing.priority
                );
                false
            }
            Some(existing) => {
                info!(
                    "Skill '{}' from {} replaces {} registration",
                    skill.name, skill.scope, existing.scope
                );
                true
            }
            None => {
                debug!("Registered skill: {} ({})", skill.name, skill.scope);
                true
            }
        };
        if replace {
            state.winners.insert(skill.name.clone(), skill);
        }
        Ok(())
    }

    /// Register skills in order, stopping at the first invalid one.
    ///
    /// Skills registered before the failure stay registered.
    pub fn register_many<I>(&self, skills: I) -> Result<usize, SkillError>
    where
        I: IntoIterator<Item = Skill>,
    {
        let mut count = 0;
        for skill in skills {
            self.register(skill)?;
            count += 1;
        }
        Ok(count)
    }

    /// Get the winning skill for `name`.
    pub fn get(&self, name: &str) -> Result<Skill, SkillError> {
        self.state
            .read()
            .winners
            .get(name)
            .cloned()
            .ok_or_else(|| SkillError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().winners.contains_key(name)
    }

    /// Winning skills, sorted by name.
    pub fn list(&self) -> Vec<Skill> {
        let mut skills: Vec<Skill> = self.state.read().winners.values().cloned().collect();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        skills
    }

    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.catalog_where(|_| true)
    }

    pub fn user_invocable_catalog(&self) -> Vec<CatalogEntry> {
        self.catalog_where(|s| s.user_invocable)
    }

    pub fn model_invocable_catalog(&self) -> Vec<CatalogEntry> {
        self.catalog_where(|s| s.model_invocable)
    }

    fn catalog_where(&self, keep: impl Fn(&Skill) -> bool) -> Vec<CatalogEntry> {
        self.list()
            .iter()
            .filter(|s| keep(s))
            .map(Skill::catalog_entry)
            .collect()
    }

    /// Every registration retained for `name`, winners and shadowed alike,
    /// in registration order.
    pub fn registrations(&self, name: &str) -> Vec<Skill> {
        self.state
            .read()
            .all
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    /// Number of distinct skill names.
    pub fn len(&self) -> usize {
        self.state.read().winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.write();
        state.winners.clear();
        state.all.clear();
    }

    /// Scan `roots` once through `source` and register what it finds.
    pub async fn initialize(
        &self,
        source: &dyn SkillSource,
        roots: &[SkillRoot],
    ) -> Result<usize, SkillError> {
        let skills = source.scan(roots).await?;
        let count = self.register_many(skills)?;
        info!(
            "Registered {} skills ({} distinct) from {} roots",
            count,
            self.len(),
            roots.len()
        );
        Ok(count)
    }

    /// Clear everything, then initialize again.
    ///
    /// No lock is held across the scan, so concurrent readers may briefly
    /// see an empty registry.
    pub async fn reload(
        &self,
        source: &dyn SkillSource,
        roots: &[SkillRoot],
    ) -> Result<usize, SkillError> {
        info!("Reloading skills");
        self.clear();
        self.initialize(source, roots).await
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
