use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use crate::credentials::CredentialSource;
use crate::errors::{AgentError, AgentResult};
use crate::events::{Category, EventSink, Severity};
use crate::tools::ToolExecutor;

pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const GOOGLE_CX: &str = "GOOGLE_CX";

const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const MAX_SNIPPETS: usize = 3;

/// Web search over the Google Custom Search API.
pub struct SearchTool {
    http: Client,
    endpoint: String,
    credentials: Arc<dyn CredentialSource>,
    ui: Arc<dyn EventSink>,
}

impl SearchTool {
    pub fn new(credentials: Arc<dyn CredentialSource>, ui: Arc<dyn EventSink>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
            ui,
        })
    }

    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn run_query(&self, query: &str, key: &str, cx: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("key", key), ("cx", cx), ("q", query)])
            .send()
            .await?;

        let data: Value = response.json().await?;

        if let Some(error) = data.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown search error");
            anyhow::bail!("{message}");
        }

        let snippets = data
            .get("items")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .take(MAX_SNIPPETS)
                    .map(|item| {
                        format!(
                            "- {}: {}",
                            item.get("title").and_then(|t| t.as_str()).unwrap_or(""),
                            item.get("snippet").and_then(|s| s.as_str()).unwrap_or(""),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(snippets)
    }
}

#[async_trait]
impl ToolExecutor for SearchTool {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search Google for information"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: Value) -> AgentResult<String> {
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AgentError::InvalidArguments("search requires a 'query' string".to_string())
            })?;

        let (Some(key), Some(cx)) = (
            self.credentials.get(GOOGLE_API_KEY),
            self.credentials.get(GOOGLE_CX),
        ) else {
            self.ui
                .alert("Missing Google API credentials", Severity::Danger);
            return Ok("Search failed (missing credentials)".to_string());
        };

        match self.run_query(query, &key, &cx).await {
            Ok(snippets) if snippets.is_empty() => {
                self.ui
                    .message("Search Results", "No results found.", Category::Tool);
                Ok("No results found.".to_string())
            }
            Ok(snippets) => {
                let joined = snippets.join("\n");
                self.ui.message("Search Results", &joined, Category::Tool);
                Ok(joined)
            }
            Err(err) => {
                self.ui
                    .alert(&format!("Google Search failed: {err}"), Severity::Danger);
                Ok(format!("Search failed: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentials;
    use crate::events::{Event, RecordingSink};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_with(
        server: &MockServer,
        credentials: StaticCredentials,
        ui: Arc<RecordingSink>,
    ) -> SearchTool {
        SearchTool::new(Arc::new(credentials), ui)
            .unwrap()
            .with_endpoint(format!("{}/customsearch/v1", server.uri()))
    }

    fn creds() -> StaticCredentials {
        StaticCredentials::new(&[(GOOGLE_API_KEY, "k"), (GOOGLE_CX, "cx")])
    }

    #[tokio::test]
    async fn test_formats_top_snippets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .and(query_param("q", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"title": "A", "snippet": "first"},
                    {"title": "B", "snippet": "second"},
                    {"title": "C", "snippet": "third"},
                    {"title": "D", "snippet": "fourth"}
                ]
            })))
            .mount(&server)
            .await;

        let ui = Arc::new(RecordingSink::new());
        let tool = tool_with(&server, creds(), ui.clone());

        let result = tool.execute(json!({"query": "rust"})).await.unwrap();
        assert_eq!(result, "- A: first\n- B: second\n- C: third");
        assert!(ui.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_zero_results_literal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let ui = Arc::new(RecordingSink::new());
        let tool = tool_with(&server, creds(), ui.clone());

        let result = tool.execute(json!({"query": "nothing"})).await.unwrap();
        assert_eq!(result, "No results found.");

        // Display message carries the same text, and no alert fires.
        assert!(ui.alerts().is_empty());
        assert!(ui.messages().iter().any(|event| matches!(
            event,
            Event::Message { text, .. } if text == "No results found."
        )));
    }

    #[tokio::test]
    async fn test_error_payload_folded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customsearch/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": { "message": "quota exceeded" }
            })))
            .mount(&server)
            .await;

        let ui = Arc::new(RecordingSink::new());
        let tool = tool_with(&server, creds(), ui.clone());

        let result = tool.execute(json!({"query": "rust"})).await.unwrap();
        assert_eq!(result, "Search failed: quota exceeded");
        assert_eq!(ui.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let server = MockServer::start().await;
        let ui = Arc::new(RecordingSink::new());
        let tool = tool_with(&server, StaticCredentials::empty(), ui.clone());

        let result = tool.execute(json!({"query": "rust"})).await.unwrap();
        assert_eq!(result, "Search failed (missing credentials)");
        assert!(matches!(
            ui.alerts()[0],
            Event::Alert { ref text, severity: Severity::Danger } if text.contains("credentials")
        ));
    }

    #[tokio::test]
    async fn test_missing_query_is_fatal() {
        let server = MockServer::start().await;
        let ui = Arc::new(RecordingSink::new());
        let tool = tool_with(&server, creds(), ui);

        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidArguments(_)));
    }
}
