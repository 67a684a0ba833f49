use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::credentials::CredentialSource;
use crate::errors::{AgentError, AgentResult};
use crate::events::{EventSink, Severity};
use crate::providers::gateway::GatewayClient;
use crate::tools::ToolExecutor;

pub const AIPIPE_API_KEY: &str = "AIPIPE_API_KEY";

/// Hands a one-shot prompt to another model behind the same gateway.
///
/// The client is built per call so a key entered interactively after
/// startup is picked up without restarting.
pub struct DelegateTool {
    host: String,
    credentials: Arc<dyn CredentialSource>,
    ui: Arc<dyn EventSink>,
}

impl DelegateTool {
    pub fn new<S: Into<String>>(
        host: S,
        credentials: Arc<dyn CredentialSource>,
        ui: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            host: host.into(),
            credentials,
            ui,
        }
    }

    async fn call(&self, model: &str, prompt: &str, key: &str) -> Result<String> {
        let client = GatewayClient::new(&self.host, key)?;
        client.chat_once(model, prompt).await.map_err(|e| match e {
            AgentError::Provider(message) => anyhow::anyhow!(message),
            other => anyhow::anyhow!(other),
        })
    }
}

#[async_trait]
impl ToolExecutor for DelegateTool {
    fn name(&self) -> &str {
        "aiPipeCall"
    }

    fn description(&self) -> &str {
        "Call another AI Pipe model"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "model": { "type": "string" },
                "prompt": { "type": "string" }
            },
            "required": ["model", "prompt"]
        })
    }

    async fn execute(&self, arguments: Value) -> AgentResult<String> {
        let model = arguments
            .get("model")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AgentError::InvalidArguments("aiPipeCall requires a 'model' string".to_string())
            })?;
        let prompt = arguments
            .get("prompt")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AgentError::InvalidArguments("aiPipeCall requires a 'prompt' string".to_string())
            })?;

        let Some(key) = self.credentials.get(AIPIPE_API_KEY) else {
            self.ui.alert("Missing AI Pipe API key", Severity::Danger);
            return Ok("AI Pipe call failed: missing credentials".to_string());
        };

        match self.call(model, prompt, &key).await {
            Ok(content) => Ok(content),
            Err(err) => {
                self.ui
                    .alert(&format!("AI Pipe call failed: {err}"), Severity::Danger);
                Ok(format!("AI Pipe call failed: {err}"))
            }
        }
    }
}
