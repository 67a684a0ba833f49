use serde::{Deserialize, Serialize};
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AgentError {
    /// The remote endpoint returned an error payload. Not retried.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Missing credential: {0}")]
    CredentialMissing(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The model supplied arguments the tool layer cannot parse. Fatal to
    /// the turn, unlike tool execution failures which are folded into the
    /// tool result string.
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
