//! One-time construction of the shared application state.
//!
//! Everything here runs before the listener binds: fetch the source page,
//! split and embed it, then wire the tools, model client, agent and harness.

use std::sync::Arc;

use thiserror::Error;

use crate::agent::Agent;
use crate::config::{Config, ConfigError};
use crate::embeddings::{Embedder, EmbeddingError, OpenAiEmbedder};
use crate::harness::Harness;
use crate::index::VectorIndex;
use crate::ingest::{fetch_document, Document, FetchError, TextSplitter};
use crate::llm::{LlmClient, LlmError, OpenAiClient};
use crate::tools::{ArxivSearch, RetrieverSearch, Tool, ToolRegistry, WikipediaSearch};

const USER_AGENT: &str = concat!("knowledge-center/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to load source document: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to build vector index: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Failed to create model client: {0}")]
    Llm(#[from] LlmError),

    #[error("Failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Process-wide state shared by all requests.
pub struct Components {
    pub harness: Arc<Harness>,
    pub tools: Arc<ToolRegistry>,
    pub source_url: String,
    pub chunk_count: usize,
    pub dimension: usize,
}

/// Build everything from configuration using the real providers.
pub async fn build(config: &Config) -> Result<Components, StartupError> {
    let client = http_client(config)?;
    let document = fetch_document(&client, &config.retrieval.source_url).await?;
    tracing::info!(
        "Loaded {} characters from {}",
        document.content.chars().count(),
        document.source
    );

    let provider = &config.provider;
    let embedder = OpenAiEmbedder::new(
        &provider.api_key,
        &provider.base_url,
        &provider.embedding_model,
        provider.embedding_batch_size,
        config.request_timeout,
    )?;
    let llm = OpenAiClient::new(
        &provider.api_key,
        &provider.base_url,
        provider.temperature,
        config.request_timeout,
    )?;

    assemble(config, client, document, Arc::new(embedder), Arc::new(llm)).await
}

/// Wire the components around an already fetched document.
pub async fn assemble(
    config: &Config,
    client: reqwest::Client,
    document: Document,
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LlmClient>,
) -> Result<Components, StartupError> {
    let splitter = TextSplitter::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap)?;
    let chunks = splitter.split(&document);
    tracing::info!(
        "Split document into {} chunks (size {}, overlap {})",
        chunks.len(),
        splitter.chunk_size(),
        splitter.chunk_overlap()
    );

    let index = Arc::new(VectorIndex::build(chunks, embedder).await?);
    let chunk_count = index.len();
    let dimension = index.dimension();

    let search = &config.search;
    let retrieval = &config.retrieval;
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(WikipediaSearch::new(
            client.clone(),
            &search.wikipedia_api_url,
            search.top_k_results,
            search.max_chars,
        )),
        Arc::new(ArxivSearch::new(
            client,
            &search.arxiv_api_url,
            search.top_k_results,
            search.max_chars,
        )),
        Arc::new(RetrieverSearch::new(
            index,
            &retrieval.tool_name,
            &retrieval.tool_description,
            retrieval.top_k,
            retrieval.max_chars,
        )),
    ];
    let tools = Arc::new(ToolRegistry::new(tools, config.request_timeout));
    tracing::info!(
        "Registered tools: {}",
        tools
            .list_tools()
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let agent = Agent::new(
        llm,
        Arc::clone(&tools),
        config.provider.chat_model.clone(),
        config.max_iterations,
        config.request_timeout,
    );

    Ok(Components {
        harness: Arc::new(Harness::new(Arc::new(agent))),
        tools,
        source_url: document.source,
        chunk_count,
        dimension,
    })
}

fn http_client(config: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::testing::{answer, spawn_server, unreachable_url, FailingEmbedder, KeywordEmbedder, ScriptedLlm};
    use crate::tools::ToolKind;

    const PAGE: &str = "<html><body><h1>LangSmith</h1>\
        <p>LangSmith is a platform for building production-grade LLM applications.</p>\
        <p>It lets you trace, debug and evaluate your application.</p></body></html>";

    async fn fake_embeddings(Json(body): Json<Value>) -> Json<Value> {
        let inputs = body["input"].as_array().cloned().unwrap_or_default();
        let data: Vec<Value> = inputs
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let len = text.as_str().unwrap_or("").len() as f32;
                json!({ "index": i, "embedding": [len, 1.0, 0.5] })
            })
            .collect();
        Json(json!({ "data": data }))
    }

    fn small_config(source_url: String, base_url: String) -> Config {
        let mut config = Config::new("sk-test".to_string(), source_url);
        config.provider.base_url = base_url;
        config.retrieval.chunk_size = 60;
        config.retrieval.chunk_overlap = 10;
        config
    }

    fn document(text: &str) -> Document {
        Document {
            source: "https://docs.example.com/".to_string(),
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn builds_from_a_served_page() {
        let router = Router::new()
            .route(
                "/docs",
                get(|| async { ([(header::CONTENT_TYPE, "text/html")], PAGE) }),
            )
            .route("/v1/embeddings", post(fake_embeddings));
        let base = spawn_server(router).await;
        let config = small_config(format!("{}/docs", base), format!("{}/v1", base));

        let components = build(&config).await.expect("startup");
        assert!(components.chunk_count > 1);
        assert_eq!(components.dimension, 3);
        assert_eq!(components.source_url, format!("{}/docs", base));

        let kinds: Vec<ToolKind> = components.tools.list_tools().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![ToolKind::Encyclopedia, ToolKind::Preprint, ToolKind::Retrieval]
        );
        assert!(components.tools.get("langsmith_search").is_some());
    }

    #[tokio::test]
    async fn unreachable_source_is_fatal() {
        let config = small_config(unreachable_url().await, "http://127.0.0.1:9/v1".to_string());
        let err = build(&config).await.err().expect("startup should fail");
        assert!(matches!(err, StartupError::Fetch(FetchError::Network { .. })));
    }

    #[tokio::test]
    async fn embedding_failure_is_fatal() {
        let config = Config::new("sk-test".to_string(), "https://docs.example.com/".to_string());
        let llm = Arc::new(ScriptedLlm::new(Vec::new()));
        let err = assemble(
            &config,
            reqwest::Client::new(),
            document("LangSmith traces LLM applications."),
            Arc::new(FailingEmbedder),
            llm,
        )
        .await
        .err()
        .expect("startup should fail");
        assert!(matches!(err, StartupError::Embedding(EmbeddingError::Http { status: 503, .. })));
    }

    #[tokio::test]
    async fn assembled_harness_answers() {
        let config = Config::new("sk-test".to_string(), "https://docs.example.com/".to_string());
        let llm = Arc::new(ScriptedLlm::new(vec![answer("Hello.")]));
        let components = assemble(
            &config,
            reqwest::Client::new(),
            document("LangSmith traces LLM applications."),
            Arc::new(KeywordEmbedder::default()),
            llm.clone(),
        )
        .await
        .expect("startup");
        assert_eq!(components.chunk_count, 1);

        let turn = components.harness.run("hi").await.expect("turn");
        assert_eq!(turn.answer, "Hello.");
        assert_eq!(llm.request_count(), 1);
    }
}
