use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::Provider;

/// Offline provider that repeats the last message back.
///
/// Needs no credentials and never requests a tool, so it doubles as a
/// smoke check for the rest of the pipeline.
pub struct EchoProvider;

#[async_trait]
impl Provider for EchoProvider {
    async fn chat(&self, messages: &[Message], _tools: &[Tool]) -> AgentResult<Message> {
        let last = messages.last().map(|m| m.text()).unwrap_or_default();
        Ok(Message::assistant(format!("Echo: {last}")))
    }
}
