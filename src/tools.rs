pub mod code;
pub mod delegate;
pub mod search;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::Tool;
use crate::providers::utils::is_valid_function_name;

/// One callable capability exposed to the model.
///
/// Executors fold their own operational failures (network, execution) into
/// the returned string so the model can read them and react. Only a
/// malformed argument record escapes as an error, which aborts the turn.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema for the argument record.
    fn parameters(&self) -> Value;
    async fn execute(&self, arguments: Value) -> AgentResult<String>;
}

/// Maps tool names to executors.
///
/// The declarations offered to the provider are derived from the
/// registered executors, so the declared and the executable sets cannot
/// drift apart. Registration validates the name and the schema up front.
#[derive(Default)]
pub struct ToolRegistry {
    executors: HashMap<String, Box<dyn ToolExecutor>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, executor: Box<dyn ToolExecutor>) -> AgentResult<()> {
        let name = executor.name().to_string();

        if !is_valid_function_name(&name) {
            return Err(AgentError::Internal(format!(
                "invalid tool name: {name:?}"
            )));
        }
        if self.executors.contains_key(&name) {
            return Err(AgentError::Internal(format!("duplicate tool name: {name}")));
        }

        let schema = executor.parameters();
        if schema.get("type").and_then(|t| t.as_str()) != Some("object") {
            return Err(AgentError::Internal(format!(
                "tool {name} must declare an object schema"
            )));
        }

        self.order.push(name.clone());
        self.executors.insert(name, executor);
        Ok(())
    }

    /// Declarations for the provider, in registration order.
    pub fn descriptors(&self) -> Vec<Tool> {
        self.order
            .iter()
            .map(|name| {
                let executor = &self.executors[name];
                Tool::new(executor.name(), executor.description(), executor.parameters())
            })
            .collect()
    }

    pub async fn dispatch(&self, name: &str, arguments: Value) -> AgentResult<String> {
        let executor = self
            .executors
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        executor.execute(arguments).await
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
