use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};

/// A tool that can be used by a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema for the arguments the tool accepts
    pub parameters: Value,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool invocation requested by the model within one assistant turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Identifier the tool result must echo back as `tool_call_id`
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument record, parsed only at dispatch time
    pub arguments: String,
}

impl ToolCall {
    pub fn function<I, N>(id: I, name: N, arguments: &Value) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        ToolCall {
            id: id.into(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.to_string(),
            },
        }
    }

    /// Decode the argument record the provider produced for this call.
    pub fn parse_arguments(&self) -> AgentResult<Value> {
        serde_json::from_str(&self.function.arguments).map_err(|e| {
            AgentError::InvalidArguments(format!(
                "could not interpret arguments for call {}: {}",
                self.id, e
            ))
        })
    }
}
