use super::*;
use agentcore_protocols::skill::RenderedSkill;
use agentcore_protocols::subagent::ResourceLimits;
use agentcore_protocols::types::Message;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Runs until cancelled, then reports `cancelled` as the contract asks.
struct UntilCancelled;

#[async_trait]
impl SubagentExecutor for UntilCancelled {
    async fn execute(
        &self,
        cancel: CancellationToken,
        context: SubagentContext,
    ) -> Result<SubagentResult, SubagentError> {
        cancel.cancelled().await;
        Ok(SubagentResult::cancelled(context.id))
    }
}

/// Finishes right away, echoing the last history message.
struct Immediate {
    seen: Mutex<Vec<SubagentContext>>,
}

#[async_trait]
impl SubagentExecutor for Immediate {
    async fn execute(
        &self,
        _cancel: CancellationToken,
        context: SubagentContext,
    ) -> Result<SubagentResult, SubagentError> {
        self.seen.lock().push(context.clone());
        let last = context
            .conversation_history
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(SubagentResult::complete(context.id, format!("done: {}", last)))
    }
}

struct Failing;

#[async_trait]
impl SubagentExecutor for Failing {
    async fn execute(
        &self,
        _cancel: CancellationToken,
        _context: SubagentContext,
    ) -> Result<SubagentResult, SubagentError> {
        Err(SubagentError::ExecutionFailed("model unavailable".to_string()))
    }
}

struct Panicking;

#[async_trait]
impl SubagentExecutor for Panicking {
    async fn execute(
        &self,
        _cancel: CancellationToken,
        _context: SubagentContext,
    ) -> Result<SubagentResult, SubagentError> {
        panic!("executor bug");
    }
}

/// Ignores cancellation and errors once it finally wakes up.
struct ErrorsAfterCancel;

#[async_trait]
impl SubagentExecutor for ErrorsAfterCancel {
    async fn execute(
        &self,
        cancel: CancellationToken,
        _context: SubagentContext,
    ) -> Result<SubagentResult, SubagentError> {
        cancel.cancelled().await;
        Err(SubagentError::ExecutionFailed("interrupted".to_string()))
    }
}

fn context(id: &str) -> SubagentContext {
    let skill = RenderedSkill {
        skill_name: "review".to_string(),
        prompt: "Review: main.go".to_string(),
        allowed_tools: vec!["exec".to_string()],
    };
    SubagentContext::fork(
        id,
        "main",
        &[Message::user("hi")],
        &skill,
        ResourceLimits::default(),
    )
}

async fn wait_terminal(manager: &SubagentManager, id: &str) -> SubagentResult {
    for _ in 0..100 {
        let status = manager.get_status(id).unwrap();
        if status.status.is_terminal() {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("subagent {} did not finish", id);
}

#[tokio::test]
async fn test_start_then_cancel() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    manager.start(context("s1")).unwrap();
    manager.cancel("s1").unwrap();

    let status = wait_terminal(&manager, "s1").await;
    assert_eq!(status.status, SubagentStatus::Cancelled);
    assert_eq!(status.subagent_id, "s1");
}

#[tokio::test]
async fn test_status_defaults_to_running() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    manager.start(context("s1")).unwrap();

    let status = manager.get_status("s1").unwrap();
    assert_eq!(status.status, SubagentStatus::Running);
    assert_eq!(manager.list_running(), vec!["s1"]);
    manager.shutdown();
}

#[tokio::test]
async fn test_complete_result_stands_after_cancel() {
    let manager = SubagentManager::new(Arc::new(Immediate {
        seen: Mutex::new(Vec::new()),
    }));
    manager.start(context("s1")).unwrap();

    let status = wait_terminal(&manager, "s1").await;
    assert_eq!(status.status, SubagentStatus::Complete);
    assert_eq!(status.output, "done: Review: main.go");

    let after = manager.cancel("s1").unwrap();
    assert_eq!(after.status, SubagentStatus::Complete);
}

#[tokio::test]
async fn test_executor_receives_forked_context() {
    let executor = Arc::new(Immediate {
        seen: Mutex::new(Vec::new()),
    });
    let manager = SubagentManager::new(executor.clone());
    manager.start(context("s1")).unwrap();
    wait_terminal(&manager, "s1").await;

    let seen = executor.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].conversation_history.len(), 2);
    assert_eq!(seen[0].allowed_tools, vec!["exec"]);
    assert_eq!(seen[0].limits, ResourceLimits::default());
}

#[tokio::test]
async fn test_failed_execution() {
    let manager = SubagentManager::new(Arc::new(Failing));
    manager.start(context("s1")).unwrap();

    let status = wait_terminal(&manager, "s1").await;
    assert_eq!(status.status, SubagentStatus::Failed);
    assert!(status.error_message.unwrap().contains("model unavailable"));
}

#[tokio::test]
async fn test_error_after_cancel_stays_cancelled() {
    let manager = SubagentManager::new(Arc::new(ErrorsAfterCancel));
    manager.start(context("s1")).unwrap();
    manager.cancel("s1").unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        manager.get_status("s1").unwrap().status,
        SubagentStatus::Cancelled
    );
}

#[tokio::test]
async fn test_duplicate_id_rejected() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    manager.start(context("s1")).unwrap();
    assert!(matches!(
        manager.start(context("s1")),
        Err(SubagentError::AlreadyExists(_))
    ));
    manager.shutdown();
}

#[tokio::test]
async fn test_empty_id_rejected() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    assert!(matches!(
        manager.start(context("")),
        Err(SubagentError::InvalidContext(_))
    ));
}

#[tokio::test]
async fn test_unknown_id() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    assert!(matches!(manager.get_status("nope"), Err(SubagentError::NotFound(_))));
    assert!(matches!(manager.cancel("nope"), Err(SubagentError::NotFound(_))));
}

#[tokio::test]
async fn test_concurrency_limit() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled)).with_max_concurrent(2);
    manager.start(context("a")).unwrap();
    manager.start(context("b")).unwrap();
    assert!(matches!(
        manager.start(context("c")),
        Err(SubagentError::LimitReached(2))
    ));

    manager.cancel("a").unwrap();
    manager.start(context("c")).unwrap();
    assert_eq!(manager.list_running(), vec!["b", "c"]);
    manager.shutdown();
}

#[tokio::test]
async fn test_parent_token_cancels_linked_subagent() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    let parent = CancellationToken::new();
    manager.start_linked(context("s1"), &parent).unwrap();

    parent.cancel();
    let status = wait_terminal(&manager, "s1").await;
    assert_eq!(status.status, SubagentStatus::Cancelled);
}

#[tokio::test]
async fn test_list_and_parent_filter() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    manager.start(context("s1")).unwrap();
    let mut other = context("s2");
    other.parent_context_id = "other".to_string();
    manager.start(other).unwrap();

    assert_eq!(manager.list().len(), 2);
    let children = manager.list_by_parent("main");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, "s1");
    assert_eq!(children[0].skill_name, "review");
    manager.shutdown();
}

#[tokio::test]
async fn test_purge_finished() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    manager.start(context("done")).unwrap();
    manager.start(context("live")).unwrap();
    manager.cancel("done").unwrap();

    assert_eq!(manager.purge_finished(Duration::from_secs(3600)), 0);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(manager.purge_finished(Duration::from_millis(1)), 1);
    assert!(manager.get_status("done").is_err());
    assert!(manager.get_status("live").is_ok());
    manager.shutdown();
}

#[tokio::test]
async fn test_many_concurrent_subagents() {
    let manager = SubagentManager::new(Arc::new(Immediate {
        seen: Mutex::new(Vec::new()),
    }))
    .with_max_concurrent(100);
    for i in 0..20 {
        manager.start(context(&format!("s{}", i))).unwrap();
    }
    for i in 0..20 {
        let status = wait_terminal(&manager, &format!("s{}", i)).await;
        assert_eq!(status.status, SubagentStatus::Complete);
    }
    assert_eq!(manager.running_count(), 0);
}

#[tokio::test]
async fn test_panicking_executor_marks_failed_and_frees_slot() {
    let manager = SubagentManager::new(Arc::new(Panicking)).with_max_concurrent(1);
    manager.start(context("p1")).unwrap();

    let status = wait_terminal(&manager, "p1").await;
    assert_eq!(status.status, SubagentStatus::Failed);
    assert_eq!(status.error_message.as_deref(), Some("executor panicked"));
    assert!(manager.list_running().is_empty());
    assert!(manager.start(context("p2")).is_ok());
}

#[tokio::test]
async fn test_shutdown_cancels_executor_token() {
    let manager = SubagentManager::new(Arc::new(UntilCancelled));
    manager.start(context("s1")).unwrap();
    manager.shutdown();

    assert_eq!(
        manager.get_status("s1").unwrap().status,
        SubagentStatus::Cancelled
    );
    assert!(manager.root.is_cancelled());
}
