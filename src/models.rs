//! These models represent the objects passed around by the agent
//!
//! The wire format is the chat-completion message shape: a flat role plus
//! optional content, tool calls, and tool call id. Messages serialize
//! directly into the gateway request body, so there is no separate
//! request-building representation to keep in sync.
pub mod message;
pub mod tool;
