use regex::Regex;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, Role};
use crate::models::tool::{FunctionCall, Tool, ToolCall};

/// Convert tool descriptors to the function-declaration wire format.
pub fn tools_to_spec(tools: &[Tool]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }
            })
        })
        .collect()
}

/// Parse the first choice of a chat-completion response into a Message.
///
/// Tool-call arguments stay as the raw strings the provider produced; they
/// are only decoded at dispatch time, where a decode failure is fatal to
/// that turn.
pub fn response_to_message(response: &Value) -> AgentResult<Message> {
    let choice = response["choices"][0]
        .get("message")
        .ok_or_else(|| AgentError::Provider("response carried no message".to_string()))?;

    let content = choice
        .get("content")
        .and_then(|v| v.as_str())
        .map(String::from);

    let mut calls = Vec::new();
    if let Some(array) = choice.get("tool_calls").and_then(|v| v.as_array()) {
        for call in array {
            let id = call["id"].as_str().unwrap_or_default().to_string();
            let name = call["function"]["name"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let arguments = call["function"]["arguments"]
                .as_str()
                .unwrap_or_default()
                .to_string();

            if !is_valid_function_name(&name) {
                return Err(AgentError::ToolNotFound(format!(
                    "function name '{}' has invalid characters, expected [a-zA-Z0-9_-]+",
                    name
                )));
            }

            calls.push(ToolCall {
                id,
                kind: "function".to_string(),
                function: FunctionCall { name, arguments },
            });
        }
    }

    Ok(Message {
        role: Role::Assistant,
        content,
        tool_calls: (!calls.is_empty()).then_some(calls),
        tool_call_id: None,
    })
}

pub fn is_valid_function_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap();
    re.is_match(name)
}
