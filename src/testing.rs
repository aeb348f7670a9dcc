//! Fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::embeddings::{Embedder, EmbeddingError};
use crate::ingest::DocumentChunk;
use crate::llm::{ChatMessage, ChatResponse, LlmClient, LlmError, ToolCall, ToolSchema};
use crate::tools::{require_query, Tool, ToolError, ToolKind};

pub fn chunk(index: usize, text: &str) -> DocumentChunk {
    DocumentChunk {
        source: "https://docs.example.com/".to_string(),
        index,
        start: index * 100,
        text: text.to_string(),
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}

/// A URL on a local port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}/w/api.php", addr)
}

/// Embeds text as normalized counts over a small stem vocabulary plus a bias term.
pub struct KeywordEmbedder {
    stems: Vec<&'static str>,
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self {
            stems: vec![
                "langsmith", "wikipedia", "encyclopedia", "arxiv", "physic", "evaluat", "trac",
                "llm", "preprint", "dataset",
            ],
        }
    }
}

impl KeywordEmbedder {
    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.stems.len() + 1];
        for word in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            if let Some(i) = self.stems.iter().position(|s| word.starts_with(s)) {
                vector[i] += 1.0;
            }
        }
        vector[self.stems.len()] = 1.0;
        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        vector.iter().map(|x| x / norm).collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(inputs.iter().map(|text| self.vector(text)).collect())
    }
}

/// Returns fixed vectors regardless of input.
pub struct StaticEmbedder {
    sequence: Vec<Vec<f32>>,
}

impl StaticEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            sequence: vec![vector],
        }
    }

    /// The n-th input of every call gets `sequence[n % len]`.
    pub fn with_sequence(sequence: Vec<Vec<f32>>) -> Self {
        Self { sequence }
    }
}

#[async_trait]
impl Embedder for StaticEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok((0..inputs.len())
            .map(|i| self.sequence[i % self.sequence.len()].clone())
            .collect())
    }
}

/// Fails every call.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Http {
            status: 503,
            body: "embedding service unavailable".to_string(),
        })
    }
}

/// Plays back canned model responses and records each request.
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    delay: Option<Duration>,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        _tools: Option<&[ToolSchema]>,
    ) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("script exhausted".to_string())))
    }
}

/// Model response asking for one tool call.
pub fn call_tool(id: &str, name: &str, query: &str) -> Result<ChatResponse, LlmError> {
    Ok(ChatResponse {
        content: None,
        tool_calls: Some(vec![ToolCall::new(
            id,
            name,
            serde_json::json!({ "query": query }).to_string(),
        )]),
        finish_reason: Some("tool_calls".to_string()),
    })
}

/// Model response with a final answer.
pub fn answer(text: &str) -> Result<ChatResponse, LlmError> {
    Ok(ChatResponse {
        content: Some(text.to_string()),
        tool_calls: None,
        finish_reason: Some("stop".to_string()),
    })
}

enum StaticBehavior {
    Reply(String),
    Fail,
    Sleep(Duration),
}

/// Tool with a fixed reply that records its queries.
pub struct StaticTool {
    name: String,
    kind: ToolKind,
    behavior: StaticBehavior,
    max_chars: usize,
    queries: Mutex<Vec<String>>,
}

impl StaticTool {
    pub fn ok(name: &str, kind: ToolKind, reply: String, max_chars: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            behavior: StaticBehavior::Reply(reply),
            max_chars,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Fails with a network error, like an unreachable API.
    pub fn failing(name: &str, kind: ToolKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            behavior: StaticBehavior::Fail,
            max_chars: 200,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(name: &str, delay: Duration) -> Self {
        Self {
            name: name.to_string(),
            kind: ToolKind::Encyclopedia,
            behavior: StaticBehavior::Sleep(delay),
            max_chars: 200,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Static test tool"
    }

    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let query = require_query(&args)?.to_string();
        self.queries.lock().unwrap().push(query);
        match &self.behavior {
            StaticBehavior::Reply(reply) => Ok(reply.clone()),
            StaticBehavior::Fail => Err(ToolError::Network("connection refused".to_string())),
            StaticBehavior::Sleep(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(String::new())
            }
        }
    }
}
