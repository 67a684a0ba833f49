use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::Provider;

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Mutex<Vec<Message>>,
    repeat: Option<Message>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Message>) -> Self {
        Self {
            responses: Mutex::new(responses),
            repeat: None,
        }
    }

    /// Replays the same turn forever, for exercising the step safeguard
    pub fn repeating(response: Message) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            repeat: Some(response),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn chat(&self, _messages: &[Message], _tools: &[Tool]) -> AgentResult<Message> {
        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            return Ok(responses.remove(0));
        }

        match &self.repeat {
            Some(turn) => Ok(turn.clone()),
            // Empty response once the scripted ones run out
            None => Ok(Message::assistant("")),
        }
    }
}
