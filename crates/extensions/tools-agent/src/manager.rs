//! Subagent lifecycle manager.
//!
//! Per subagent: `(none) -> running -> {complete | cancelled | failed}`.
//! The first terminal result recorded wins. A cancel issued while the
//! subagent is running is recorded immediately, so a result the executor
//! produces afterwards is discarded; a result recorded before the cancel
//! stands.
//!
//! Resource limits travel inside the context for the executor to enforce.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use agentcore_protocols::error::SubagentError;
use agentcore_protocols::subagent::{
    SubagentContext, SubagentExecutor, SubagentResult, SubagentStatus,
};

const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Snapshot of one tracked subagent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubagentInfo {
    pub id: String,
    pub parent_context_id: String,
    pub skill_name: String,
    /// Last known result; `running` until one is recorded.
    pub result: SubagentResult,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

struct Entry {
    parent_context_id: String,
    skill_name: String,
    result: Option<SubagentResult>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    cancel: CancellationToken,
}

impl Entry {
    fn is_running(&self) -> bool {
        self.result.is_none()
    }

    fn info(&self, id: &str) -> SubagentInfo {
        SubagentInfo {
            id: id.to_string(),
            parent_context_id: self.parent_context_id.clone(),
            skill_name: self.skill_name.clone(),
            result: self.status(id),
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }

    fn status(&self, id: &str) -> SubagentResult {
        self.result
            .clone()
            .unwrap_or_else(|| SubagentResult::running(id))
    }
}

type Entries = Arc<RwLock<HashMap<String, Entry>>>;

/// Launches subagents through an injected executor and tracks their status.
pub struct SubagentManager {
    executor: Arc<dyn SubagentExecutor>,
    entries: Entries,
    max_concurrent: usize,
    root: CancellationToken,
}

impl SubagentManager {
    pub fn new(executor: Arc<dyn SubagentExecutor>) -> Self {
        Self {
            executor,
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            root: CancellationToken::new(),
        }
    }

    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Register `context` under its ID and start it. Returns immediately.
    pub fn start(&self, context: SubagentContext) -> Result<(), SubagentError> {
        self.start_with_token(context, self.root.child_token())
    }

    /// Like [`start`](Self::start), but cancelling `parent` also cancels
    /// the subagent.
    pub fn start_linked(
        &self,
        context: SubagentContext,
        parent: &CancellationToken,
    ) -> Result<(), SubagentError> {
        self.start_with_token(context, parent.child_token())
    }

    fn start_with_token(
        &self,
        context: SubagentContext,
        cancel: CancellationToken,
    ) -> Result<(), SubagentError> {
        if context.id.trim().is_empty() {
            return Err(SubagentError::InvalidContext(
                "subagent id must not be empty".to_string(),
            ));
        }

        let id = context.id.clone();
        {
            let mut entries = self.entries.write();
            if entries.contains_key(&id) {
                return Err(SubagentError::AlreadyExists(id));
            }
            let running = entries.values().filter(|e| e.is_running()).count();
            if running >= self.max_concurrent {
                return Err(SubagentError::LimitReached(self.max_concurrent));
            }
            entries.insert(
                id.clone(),
                Entry {
                    parent_context_id: context.parent_context_id.clone(),
                    skill_name: context.skill_name.clone(),
                    result: None,
                    created_at: context.created_at,
                    completed_at: None,
                    cancel: cancel.clone(),
                },
            );
        }

        info!(
            "Starting subagent {} (skill: {}, parent: {})",
            id, context.skill_name, context.parent_context_id
        );

        let executor = self.executor.clone();
        let entries = self.entries.clone();
        tokio::spawn(async move {
            let run = tokio::spawn({
                let cancel = cancel.clone();
                async move { executor.execute(cancel, context).await }
            });
            let outcome = match run.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Subagent {} executor aborted: {}", id, e);
                    let failed = SubagentResult::failed(id.clone(), "executor panicked");
                    record(&entries, &id, failed);
                    return;
                }
            };
            let result = match outcome {
                Ok(mut result) => {
                    result.subagent_id = id.clone();
                    if result.status == SubagentStatus::Running {
                        result.status = SubagentStatus::Complete;
                    }
                    result
                }
                Err(e) if cancel.is_cancelled() => {
                    debug!("Subagent {} errored after cancel: {}", id, e);
                    SubagentResult::cancelled(id.clone())
                }
                Err(e) => SubagentResult::failed(id.clone(), e.to_string()),
            };
            record(&entries, &id, result);
        });

        Ok(())
    }

    /// Signal cancellation. A running subagent is marked cancelled at once.
    pub fn cancel(&self, id: &str) -> Result<SubagentResult, SubagentError> {
        let mut entries = self.entries.write();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| SubagentError::NotFound(id.to_string()))?;

        if entry.is_running() {
            entry.cancel.cancel();
            entry.result = Some(SubagentResult::cancelled(id));
            entry.completed_at = Some(Utc::now());
            info!("Cancelled subagent {}", id);
        } else {
            debug!("Subagent {} already finished", id);
        }
        Ok(entry.status(id))
    }

    /// Last known result. Never waits on the subagent.
    pub fn get_status(&self, id: &str) -> Result<SubagentResult, SubagentError> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.status(id))
            .ok_or_else(|| SubagentError::NotFound(id.to_string()))
    }

    pub fn get_info(&self, id: &str) -> Result<SubagentInfo, SubagentError> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.info(id))
            .ok_or_else(|| SubagentError::NotFound(id.to_string()))
    }

    /// IDs of subagents whose last known status is running, sorted.
    pub fn list_running(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .iter()
            .filter(|(_, e)| e.is_running())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Snapshots of every tracked subagent, oldest first.
    pub fn list(&self) -> Vec<SubagentInfo> {
        let mut infos: Vec<SubagentInfo> = self
            .entries
            .read()
            .iter()
            .map(|(id, e)| e.info(id))
            .collect();
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        infos
    }

    /// Subagents spawned from `parent_context_id`.
    pub fn list_by_parent(&self, parent_context_id: &str) -> Vec<SubagentInfo> {
        self.list()
            .into_iter()
            .filter(|info| info.parent_context_id == parent_context_id)
            .collect()
    }

    pub fn running_count(&self) -> usize {
        self.entries.read().values().filter(|e| e.is_running()).count()
    }

    /// Evict finished subagents that completed more than `max_age` ago.
    pub fn purge_finished(&self, max_age: Duration) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| match e.completed_at {
            Some(done) if !e.is_running() => (now - done)
                .to_std()
                .map(|age| age <= max_age)
                .unwrap_or(true),
            _ => true,
        });
        let purged = before - entries.len();
        if purged > 0 {
            debug!("Purged {} finished subagents", purged);
        }
        purged
    }

    /// Cancel every running subagent started through [`start`](Self::start)
    /// or [`start_linked`](Self::start_linked).
    pub fn shutdown(&self) {
        let running = self.list_running();
        if !running.is_empty() {
            warn!("Cancelling {} running subagents", running.len());
        }
        for id in running {
            let _ = self.cancel(&id);
        }
        self.root.cancel();
    }
}

/// Store `result` unless a terminal result is already recorded.
fn record(entries: &RwLock<HashMap<String, Entry>>, id: &str, result: SubagentResult) {
    let mut entries = entries.write();
    let Some(entry) = entries.get_mut(id) else {
        return;
    };
    if entry.result.is_some() {
        debug!("Discarding late {} result for subagent {}", result.status, id);
        return;
    }
    info!("Subagent {} finished: {}", id, result.status);
    entry.result = Some(result);
    entry.completed_at = Some(Utc::now());
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
