use std::sync::Arc;

use crate::errors::AgentResult;
use crate::events::{Category, EventSink, Severity};
use crate::models::message::Message;
use crate::providers::base::Provider;
use crate::session::Session;
use crate::tools::ToolRegistry;

pub const DEFAULT_MAX_STEPS: usize = 5;

/// Outcome of one agent run over a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// The model produced a final answer.
    Done(String),
    /// The step bound was reached before a final answer. A designed
    /// termination, not a failure.
    Safeguarded { steps: usize },
}

/// Drives one conversation turn to completion: calls the provider,
/// executes requested tool calls strictly in issuance order, and stops on
/// a final answer or the step bound.
pub struct Agent {
    provider: Box<dyn Provider>,
    tools: ToolRegistry,
    ui: Arc<dyn EventSink>,
    max_steps: usize,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider>, tools: ToolRegistry, ui: Arc<dyn EventSink>) -> Self {
        Self {
            provider,
            tools,
            ui,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Process one user turn, possibly spanning several provider round
    /// trips. The session only ever grows; tool results are appended in
    /// call order so `tool_call_id` correlation stays unambiguous on the
    /// next round.
    pub async fn run(&self, session: &mut Session) -> AgentResult<AgentOutcome> {
        let tools = self.tools.descriptors();

        for step in 0..self.max_steps {
            tracing::debug!(step, "dispatching to provider");
            let turn = self.provider.chat(session.messages(), &tools).await?;
            session.push(turn.clone());

            if let Some(calls) = turn.tool_calls.as_ref().filter(|calls| !calls.is_empty()) {
                for call in calls {
                    let arguments = call.parse_arguments()?;
                    self.ui.message(
                        "Agent",
                        &format!("Calling {} with {}", call.function.name, arguments),
                        Category::Agent,
                    );

                    let result = self.tools.dispatch(&call.function.name, arguments).await?;
                    session.push(Message::tool(call.id.clone(), result));
                }
                continue;
            }

            match turn.content.as_deref() {
                Some(content) if !content.is_empty() => {
                    self.ui.message("Agent", content, Category::Agent);
                    return Ok(AgentOutcome::Done(content.to_string()));
                }
                // A turn with neither content nor calls consumes a round.
                _ => {}
            }
        }

        self.ui
            .alert("Stopped after max steps (loop safeguard).", Severity::Warning);
        Ok(AgentOutcome::Safeguarded {
            steps: self.max_steps,
        })
    }
}
