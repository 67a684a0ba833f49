use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::Provider;
use crate::providers::utils::{response_to_message, tools_to_spec};

pub const DEFAULT_HOST: &str = "https://aipipe.org/openrouter";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
}

/// Bare chat-completion client for the gateway, shared between the
/// provider and the delegated-call tool.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    host: String,
    api_key: String,
}

impl GatewayClient {
    pub fn new(host: &str, api_key: &str) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(120)).build()?;

        Ok(Self {
            http,
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// POST the payload and surface a gateway `error` payload as a
    /// provider error. The body is inspected regardless of HTTP status
    /// since the gateway reports failures in-band.
    async fn post(&self, payload: Value) -> AgentResult<Value> {
        let url = format!("{}/v1/chat/completions", self.host);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        if let Some(error) = data.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown gateway error");
            return Err(AgentError::Provider(message.to_string()));
        }

        Ok(data)
    }

    /// Single-turn completion: one user message, no tool declarations.
    pub async fn chat_once(&self, model: &str, prompt: &str) -> AgentResult<String> {
        let payload = json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let data = self.post(payload).await?;
        let message = response_to_message(&data)?;
        Ok(message.text().to_string())
    }
}

/// Remote provider speaking the chat-completion protocol through the
/// AI Pipe gateway.
pub struct GatewayProvider {
    client: GatewayClient,
    model: String,
}

impl GatewayProvider {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            client: GatewayClient::new(&config.host, &config.api_key)?,
            model: config.model,
        })
    }
}

#[async_trait]
impl Provider for GatewayProvider {
    async fn chat(&self, messages: &[Message], tools: &[Tool]) -> AgentResult<Message> {
        let mut payload = json!({
            "model": self.model,
            "messages": messages,
        });

        if !tools.is_empty() {
            payload
                .as_object_mut()
                .unwrap()
                .insert("tools".to_string(), json!(tools_to_spec(tools)));
        }

        let data = self.client.post(payload).await?;
        response_to_message(&data)
    }
}
