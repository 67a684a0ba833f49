use std::process::Stdio;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::process::Command;

use crate::errors::{AgentError, AgentResult};
use crate::events::{Category, EventSink, Severity};
use crate::tools::ToolExecutor;

/// Executes a JS snippet somewhere isolated from the agent process.
/// How the isolation works is the runner's business.
#[async_trait]
pub trait CodeRunner: Send + Sync {
    async fn run(&self, code: &str) -> Result<String>;
}

/// Evaluates snippets in a `node -p` child process: the expression's value
/// prints on stdout, a throw lands on stderr with a nonzero exit.
pub struct NodeRunner {
    binary: String,
}

impl NodeRunner {
    pub fn new() -> Self {
        Self {
            binary: "node".to_string(),
        }
    }
}

impl Default for NodeRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeRunner for NodeRunner {
    async fn run(&self, code: &str) -> Result<String> {
        let output = Command::new(&self.binary)
            .arg("-p")
            .arg(code)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| anyhow::anyhow!("failed to launch {}: {}", self.binary, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("{}", first_error_line(&stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string())
    }
}

// Node prints a full stack trace; the line naming the error is enough
// for the model.
fn first_error_line(stderr: &str) -> &str {
    stderr
        .lines()
        .find(|line| line.contains("Error"))
        .or_else(|| stderr.lines().find(|line| !line.trim().is_empty()))
        .unwrap_or("exited with a failure status")
}

/// Sandboxed JS execution exposed to the model.
pub struct CodeTool {
    runner: Arc<dyn CodeRunner>,
    ui: Arc<dyn EventSink>,
}

impl CodeTool {
    pub fn new(runner: Arc<dyn CodeRunner>, ui: Arc<dyn EventSink>) -> Self {
        Self { runner, ui }
    }
}

#[async_trait]
impl ToolExecutor for CodeTool {
    fn name(&self) -> &str {
        "runJS"
    }

    fn description(&self) -> &str {
        "Run JavaScript code securely"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "code": { "type": "string" } },
            "required": ["code"]
        })
    }

    async fn execute(&self, arguments: Value) -> AgentResult<String> {
        let code = arguments.get("code").and_then(|v| v.as_str()).ok_or_else(|| {
            AgentError::InvalidArguments("runJS requires a 'code' string".to_string())
        })?;

        match self.runner.run(code).await {
            Ok(result) => {
                self.ui.message("JS Result", &result, Category::Tool);
                Ok(result)
            }
            Err(err) => {
                self.ui
                    .alert(&format!("JS execution failed: {err}"), Severity::Danger);
                Ok(format!("JS execution failed: {err}"))
            }
        }
    }
}
