use async_trait::async_trait;

use crate::errors::AgentResult;
use crate::models::message::Message;
use crate::models::tool::Tool;

/// One capability: produce the next assistant turn for a conversation.
///
/// `tools` is whatever declarations the caller derives from its registry.
/// Implementations forward them verbatim and never advertise a set of
/// their own, so the declared and the executable tools cannot diverge.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, messages: &[Message], tools: &[Tool]) -> AgentResult<Message>;
}
