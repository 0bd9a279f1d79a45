use super::*;

#[test]
fn test_success() {
    let result = ToolResult::success("ok");
    assert!(result.success);
    assert_eq!(result.content, "ok");
    assert!(result.error.is_none());
}

#[test]
fn test_success_json() {
    let result = ToolResult::success_json("ok", serde_json::json!({"n": 1}));
    assert!(result.success);
    assert_eq!(result.structured_output, Some(serde_json::json!({"n": 1})));
}

#[test]
fn test_error() {
    let result = ToolResult::error("bad");
    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.error.as_deref(), Some("bad"));
}

#[test]
fn test_with_metadata() {
    let result = ToolResult::success("ok").with_metadata("exit_code", serde_json::json!(3));
    assert_eq!(result.metadata.get("exit_code"), Some(&serde_json::json!(3)));
}
