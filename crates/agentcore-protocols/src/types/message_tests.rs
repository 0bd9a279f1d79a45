use super::*;

#[test]
fn test_user_message() {
    let msg = Message::user("hello");
    assert_eq!(msg.role, MessageRole::User);
    assert_eq!(msg.content, "hello");
    assert!(msg.tool_call_id.is_none());
}

#[test]
fn test_tool_message_carries_call_id() {
    let msg = Message::tool("call-1", "done");
    assert_eq!(msg.role, MessageRole::Tool);
    assert_eq!(msg.tool_call_id.as_deref(), Some("call-1"));
}

#[test]
fn test_cloned_history_is_independent() {
    let mut parent = vec![Message::user("a"), Message::assistant("b")];
    let mut child = parent.clone();

    child[0].content.push_str(" (edited)");
    child.push(Message::user("c"));
    parent[1].metadata.insert("k".into(), serde_json::json!(1));

    assert_eq!(parent[0].content, "a");
    assert_eq!(parent.len(), 2);
    assert!(child[1].metadata.is_empty());
}

#[test]
fn test_message_serialization_skips_empty_fields() {
    let json = serde_json::to_string(&Message::system("rules")).unwrap();
    assert!(json.contains("\"role\":\"system\""));
    assert!(!json.contains("tool_calls"));
    assert!(!json.contains("metadata"));
}
