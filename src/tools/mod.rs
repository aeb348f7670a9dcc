//! Lookup tools the agent can call.
//!
//! Every tool takes a single `query` string and returns text bounded by the
//! tool's `max_chars`. The registry owns the tools for the lifetime of the
//! process and applies the per-call timeout and output bound.

mod arxiv;
mod retriever;
mod wikipedia;

pub use arxiv::ArxivSearch;
pub use retriever::RetrieverSearch;
pub use wikipedia::WikipediaSearch;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::embeddings::EmbeddingError;
use crate::llm::{FunctionDefinition, ToolSchema};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("No results found for: {0}")]
    EmptyResult(String),

    #[error("Could not parse response: {0}")]
    Parse(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] EmbeddingError),

    #[error("{name} is not a valid tool, try one of [{available}].")]
    UnknownTool { name: String, available: String },
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http(status.as_u16())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// The closed set of lookup capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Public encyclopedia summaries
    Encyclopedia,
    /// Preprint repository abstracts
    Preprint,
    /// Nearest chunks from the ingested page
    Retrieval,
}

/// A lookup capability the model can choose to call.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn kind(&self) -> ToolKind;

    /// Maximum characters of output returned to the agent.
    fn max_chars(&self) -> usize;

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError>;
}

/// Descriptor shown to the model and in the UI.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub kind: ToolKind,
}

/// Owns the tool set and dispatches calls by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    timeout: Duration,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Arc<dyn Tool>>, timeout: Duration) -> Self {
        Self { tools, timeout }
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
                kind: t.kind(),
            })
            .collect()
    }

    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|t| ToolSchema {
                kind: "function".to_string(),
                function: FunctionDefinition {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters_schema(),
                },
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Execute a tool by name with the model's raw argument string.
    ///
    /// Output is cut to the tool's `max_chars`.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::UnknownTool {
            name: name.to_string(),
            available: self
                .tools
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", "),
        })?;

        let args = parse_arguments(arguments);
        let output = tokio::time::timeout(self.timeout, tool.execute(args))
            .await
            .map_err(|_| ToolError::Timeout(self.timeout))??;

        Ok(truncate_chars(&output, tool.max_chars()))
    }
}

/// Parse tool arguments, accepting a bare string as the query.
pub fn parse_arguments(arguments: &str) -> Value {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::String(query)) => json!({ "query": query }),
        Ok(value @ Value::Object(_)) => value,
        _ => json!({ "query": arguments }),
    }
}

/// Extract the required non-empty `query` argument.
pub fn require_query(args: &Value) -> Result<&str, ToolError> {
    args["query"]
        .as_str()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".to_string()))
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
