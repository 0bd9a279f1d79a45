//! Skill invocation.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use agentcore_protocols::skill::RenderedSkill;
use agentcore_protocols::subagent::{ResourceLimits, SubagentContext};
use agentcore_protocols::types::Message;
use agentcore_security::RateLimiter;
use agentcore_skills_dynamic::{Preprocessor, SkillRegistry};
use agentcore_tools_agent::SubagentManager;

use crate::error::RuntimeError;

/// Configuration for the skill runtime.
#[derive(Debug, Clone)]
pub struct SkillRuntimeConfig {
    /// Applied to skills that carry no rate limit of their own.
    pub default_rate_limit: String,

    /// Limits handed to every forked subagent.
    pub default_limits: ResourceLimits,
}

impl Default for SkillRuntimeConfig {
    fn default() -> Self {
        Self {
            default_rate_limit: "30/minute".to_string(),
            default_limits: ResourceLimits::default(),
        }
    }
}

/// Who is asking for the skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Invoker {
    User,
    Model,
}

impl std::fmt::Display for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invoker::User => f.write_str("user"),
            Invoker::Model => f.write_str("model"),
        }
    }
}

/// A request to run one skill.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub skill: String,
    pub args: Vec<String>,
    pub user_id: String,
    pub invoker: Invoker,
    pub parent_context_id: String,
    /// Parent conversation; copied, never shared, when the skill forks.
    pub history: Vec<Message>,
    /// Cancelling this also cancels a forked subagent.
    pub parent_cancel: Option<CancellationToken>,
}

impl InvocationRequest {
    pub fn new(skill: impl Into<String>, invoker: Invoker) -> Self {
        Self {
            skill: skill.into(),
            args: Vec::new(),
            user_id: "local".to_string(),
            invoker,
            parent_context_id: "main".to_string(),
            history: Vec::new(),
            parent_cancel: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_parent(mut self, parent_context_id: impl Into<String>) -> Self {
        self.parent_context_id = parent_context_id.into();
        self
    }

    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.history = history.to_vec();
        self
    }

    pub fn with_parent_cancel(mut self, token: CancellationToken) -> Self {
        self.parent_cancel = Some(token);
        self
    }
}

/// Outcome of [`SkillRuntime::invoke`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Invocation {
    /// Rendered prompt for the caller to continue with.
    Inline(RenderedSkill),
    /// The skill is running as a subagent; poll it by ID.
    Forked { subagent_id: String },
}

/// Ties the registry, preprocessor, rate limiter and subagent manager together.
pub struct SkillRuntime {
    registry: Arc<SkillRegistry>,
    preprocessor: Arc<Preprocessor>,
    subagents: Arc<SubagentManager>,
    rate_limiter: Arc<RateLimiter>,
    config: SkillRuntimeConfig,
}

impl SkillRuntime {
    pub fn new(
        registry: Arc<SkillRegistry>,
        preprocessor: Arc<Preprocessor>,
        subagents: Arc<SubagentManager>,
    ) -> Self {
        Self {
            registry,
            preprocessor,
            subagents,
            rate_limiter: Arc::new(RateLimiter::new()),
            config: SkillRuntimeConfig::default(),
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn with_config(mut self, config: SkillRuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    pub fn subagents(&self) -> &Arc<SubagentManager> {
        &self.subagents
    }

    /// Resolve, authorize, render and dispatch one skill.
    ///
    /// Fails before rendering when the invoker may not use the skill or the
    /// `(skill, user)` key is over its limit, so a rejected call never runs
    /// inline commands.
    pub async fn invoke(&self, request: InvocationRequest) -> Result<Invocation, RuntimeError> {
        let skill = self.registry.get(&request.skill)?;

        let invocable = match request.invoker {
            Invoker::User => skill.user_invocable,
            Invoker::Model => skill.model_invocable,
        };
        if !invocable {
            return Err(RuntimeError::NotInvocable {
                skill: skill.name,
                invoker: request.invoker.to_string(),
            });
        }

        let spec = skill
            .rate_limit
            .as_deref()
            .unwrap_or(&self.config.default_rate_limit);
        if !self.rate_limiter.allow(&skill.name, &request.user_id, spec)? {
            warn!(
                "Rate limit hit for skill {} (user: {}, limit: {})",
                skill.name, request.user_id, spec
            );
            return Err(RuntimeError::RateLimited {
                skill: skill.name,
                user: request.user_id,
            });
        }

        let rendered = self.preprocessor.render(&skill, &request.args).await;

        if !skill.fork_context {
            debug!("Rendered skill {} inline", skill.name);
            return Ok(Invocation::Inline(rendered));
        }

        let subagent_id = format!("subagent-{}", uuid::Uuid::new_v4());
        let context = SubagentContext::fork(
            subagent_id.clone(),
            request.parent_context_id,
            &request.history,
            &rendered,
            self.config.default_limits,
        )
        .with_metadata("user_id", request.user_id.into())
        .with_metadata("invoker", request.invoker.to_string().into());

        match &request.parent_cancel {
            Some(parent) => self.subagents.start_linked(context, parent)?,
            None => self.subagents.start(context)?,
        }

        info!("Forked skill {} as {}", skill.name, subagent_id);
        Ok(Invocation::Forked { subagent_id })
    }

    /// Drop finished subagents older than `retention` and idle rate-limit keys.
    pub fn purge(&self, retention: Duration) -> usize {
        let subagents = self.subagents.purge_finished(retention);
        let keys = self.rate_limiter.cleanup();
        debug!("Purged {} subagents and {} rate-limit keys", subagents, keys);
        subagents + keys
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
