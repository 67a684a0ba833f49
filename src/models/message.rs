use serde::{Deserialize, Serialize};

use crate::models::tool::ToolCall;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A message to or from the model.
///
/// A tool-role message always carries the `tool_call_id` of the assistant
/// tool call it answers. An assistant message carries content, a non-empty
/// set of tool calls, or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn user<S: Into<String>>(text: S) -> Self {
        Message {
            role: Role::User,
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Message {
            role: Role::Assistant,
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// An assistant turn that dispatches tool calls, with no content.
    pub fn tool_requests(calls: Vec<ToolCall>) -> Self {
        Message {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(calls),
            tool_call_id: None,
        }
    }

    /// A tool result answering the call with the given id.
    pub fn tool<I, S>(tool_call_id: I, output: S) -> Self
    where
        I: Into<String>,
        S: Into<String>,
    {
        Message {
            role: Role::Tool,
            content: Some(output.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Text of the message, empty when the message carries none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_user_message() {
        let message = Message::user("abcd");
        assert!(matches!(message.role, Role::User));
        assert_eq!(message.text(), "abcd");
        assert!(!message.has_tool_calls());
    }

    #[test]
    fn test_tool_message_carries_call_id() {
        let message = Message::tool("call_7", "result");
        assert!(matches!(message.role, Role::Tool));
        assert_eq!(message.tool_call_id.as_deref(), Some("call_7"));
        assert_eq!(message.text(), "result");
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));

        let value = serde_json::to_value(Message::tool("call_1", "out")).unwrap();
        assert_eq!(
            value,
            json!({"role": "tool", "content": "out", "tool_call_id": "call_1"})
        );
    }

    #[test]
    fn test_tool_request_turn_serialization() {
        let call = ToolCall::function("call_1", "search", &json!({"query": "rust"}));
        let value = serde_json::to_value(Message::tool_requests(vec![call])).unwrap();

        assert_eq!(value["role"], "assistant");
        assert!(value.get("content").is_none());
        assert_eq!(value["tool_calls"][0]["function"]["name"], "search");
    }

    #[test]
    fn test_roundtrip() {
        let call = ToolCall::function("call_1", "runJS", &json!({"code": "1 + 1"}));
        let message = Message::tool_requests(vec![call]);

        let encoded = serde_json::to_string(&message).unwrap();
        let decoded: Message = serde_json::from_str(&encoded).unwrap();
        assert_eq!(message, decoded);

        let raw: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(raw["role"], "assistant");
    }
}
