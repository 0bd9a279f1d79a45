//! Tool trait definition.

use async_trait::async_trait;

use super::{ToolContext, ToolDefinition, ToolResult};
use crate::error::ToolError;
use crate::types::RiskLevel;

/// Core trait for tool adapters.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> &ToolDefinition;

    async fn execute(
        &self,
        params: serde_json::Value,
        ctx: ToolContext,
    ) -> Result<ToolResult, ToolError>;

    fn risk_level(&self) -> RiskLevel {
        self.definition().risk_level
    }

    /// Reject the call when the active skill's allow-list excludes this tool.
    fn check_allowed(&self, ctx: &ToolContext) -> Result<(), ToolError> {
        let id = &self.definition().id;
        if ctx.is_tool_allowed(id) {
            Ok(())
        } else {
            Err(ToolError::PermissionDenied(format!(
                "tool '{}' is not in the skill's allowed tools",
                id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("mock_tool", "Mock Tool", "A mock tool")
                    .with_risk_level(RiskLevel::Medium),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _params: serde_json::Value,
            ctx: ToolContext,
        ) -> Result<ToolResult, ToolError> {
            self.check_allowed(&ctx)?;
            Ok(ToolResult::success("executed"))
        }
    }

    #[test]
    fn test_tool_risk_level() {
        assert_eq!(MockTool::new().risk_level(), RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_tool_execute_unrestricted() {
        let tool = MockTool::new();
        let ctx = ToolContext::new("session-1", PathBuf::from("/tmp"));
        let result = tool.execute(serde_json::json!({}), ctx).await.unwrap();
        assert_eq!(result.content, "executed");
    }

    #[tokio::test]
    async fn test_tool_execute_denied_by_allow_list() {
        let tool = MockTool::new();
        let ctx = ToolContext::new("session-1", PathBuf::from("/tmp"))
            .with_allowed_tools(vec!["other".to_string()]);
        let result = tool.execute(serde_json::json!({}), ctx).await;
        assert!(matches!(result, Err(ToolError::PermissionDenied(_))));
    }
}
