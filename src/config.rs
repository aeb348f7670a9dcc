//! Configuration management for the knowledge center.
//!
//! Configuration is read from environment variables:
//! - `OPENAI_API_KEY` - Required. Credential for the chat and embedding provider.
//! - `OPENAI_BASE_URL` - Optional. Provider base URL. Defaults to `https://api.openai.com/v1`.
//! - `CHAT_MODEL` - Optional. Chat model. Defaults to `gpt-3.5-turbo-0125`.
//! - `CHAT_TEMPERATURE` - Optional. Sampling temperature. Defaults to `0`.
//! - `EMBEDDING_MODEL` - Optional. Embedding model. Defaults to `text-embedding-ada-002`.
//! - `EMBEDDING_BATCH_SIZE` - Optional. Inputs per embedding request. Defaults to `64`.
//! - `SOURCE_URL` - Optional. Page indexed at startup. Defaults to `https://docs.smith.langchain.com/`.
//! - `CHUNK_SIZE` / `CHUNK_OVERLAP` - Optional. Splitter window in characters. Defaults to `1000` / `200`.
//! - `RETRIEVER_TOP_K` - Optional. Chunks returned by the retrieval tool. Defaults to `4`.
//! - `RETRIEVER_MAX_CHARS` - Optional. Retrieval tool output bound. Defaults to `4000`.
//! - `RETRIEVER_TOOL_NAME` / `RETRIEVER_TOOL_DESCRIPTION` - Optional. Retrieval tool descriptor.
//! - `SEARCH_TOP_K_RESULTS` - Optional. Wikipedia/arXiv result count. Defaults to `1`.
//! - `SEARCH_MAX_CHARS` - Optional. Wikipedia/arXiv output bound. Defaults to `200`.
//! - `WIKIPEDIA_API_URL` / `ARXIV_API_URL` - Optional. Search endpoints.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `15`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Timeout for each external call. Defaults to `30`.
//! - `HOST` / `PORT` - Optional. UI listener. Defaults to `127.0.0.1` / `8501`.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Language model and embedding provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API credential shared by chat and embedding calls
    pub api_key: String,

    /// OpenAI-compatible base URL
    pub base_url: String,

    /// Chat model identifier
    pub chat_model: String,

    /// Sampling temperature for the chat model
    pub temperature: f32,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Maximum inputs per embedding request
    pub embedding_batch_size: usize,
}

/// Document ingestion and retrieval settings.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Page fetched and indexed at startup
    pub source_url: String,

    /// Maximum characters per chunk
    pub chunk_size: usize,

    /// Characters shared by adjacent chunks
    pub chunk_overlap: usize,

    /// Chunks returned per retrieval query
    pub top_k: usize,

    /// Output bound for the retrieval tool
    pub max_chars: usize,

    /// Name the model sees for the retrieval tool
    pub tool_name: String,

    /// Description the model sees for the retrieval tool
    pub tool_description: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            source_url: "https://docs.smith.langchain.com/".to_string(),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 4,
            max_chars: 4000,
            tool_name: "langsmith_search".to_string(),
            tool_description: "Search LangSmith documentation".to_string(),
        }
    }
}

/// Wikipedia and arXiv search settings.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// MediaWiki API endpoint
    pub wikipedia_api_url: String,

    /// arXiv query endpoint
    pub arxiv_api_url: String,

    /// Number of underlying results per lookup
    pub top_k_results: usize,

    /// Output bound for each search tool
    pub max_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            wikipedia_api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            arxiv_api_url: "https://export.arxiv.org/api/query".to_string(),
            top_k_results: 1,
            max_chars: 200,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model provider settings
    pub provider: ProviderConfig,

    /// Ingestion and retrieval settings
    pub retrieval: RetrievalConfig,

    /// Search tool settings
    pub search: SearchConfig,

    /// Maximum planning iterations per question
    pub max_iterations: usize,

    /// Timeout applied to every external call
    pub request_timeout: Duration,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?;

        let base_url = lookup("OPENAI_BASE_URL")
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        validate_url("OPENAI_BASE_URL", &base_url)?;

        let provider = ProviderConfig {
            api_key,
            base_url,
            chat_model: lookup("CHAT_MODEL").unwrap_or_else(|| "gpt-3.5-turbo-0125".to_string()),
            temperature: parse_or(&lookup, "CHAT_TEMPERATURE", 0.0)?,
            embedding_model: lookup("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-ada-002".to_string()),
            embedding_batch_size: parse_positive(&lookup, "EMBEDDING_BATCH_SIZE", 64)?,
        };

        let defaults = RetrievalConfig::default();
        let retrieval = RetrievalConfig {
            source_url: lookup("SOURCE_URL").unwrap_or(defaults.source_url),
            chunk_size: parse_positive(&lookup, "CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_or(&lookup, "CHUNK_OVERLAP", defaults.chunk_overlap)?,
            top_k: parse_positive(&lookup, "RETRIEVER_TOP_K", defaults.top_k)?,
            max_chars: parse_positive(&lookup, "RETRIEVER_MAX_CHARS", defaults.max_chars)?,
            tool_name: lookup("RETRIEVER_TOOL_NAME").unwrap_or(defaults.tool_name),
            tool_description: lookup("RETRIEVER_TOOL_DESCRIPTION")
                .unwrap_or(defaults.tool_description),
        };
        validate_url("SOURCE_URL", &retrieval.source_url)?;
        if retrieval.chunk_overlap >= retrieval.chunk_size {
            return Err(ConfigError::InvalidValue(
                "CHUNK_OVERLAP".to_string(),
                format!(
                    "overlap {} must be smaller than chunk size {}",
                    retrieval.chunk_overlap, retrieval.chunk_size
                ),
            ));
        }

        let defaults = SearchConfig::default();
        let search = SearchConfig {
            wikipedia_api_url: lookup("WIKIPEDIA_API_URL").unwrap_or(defaults.wikipedia_api_url),
            arxiv_api_url: lookup("ARXIV_API_URL").unwrap_or(defaults.arxiv_api_url),
            top_k_results: parse_positive(&lookup, "SEARCH_TOP_K_RESULTS", defaults.top_k_results)?,
            max_chars: parse_positive(&lookup, "SEARCH_MAX_CHARS", defaults.max_chars)?,
        };
        validate_url("WIKIPEDIA_API_URL", &search.wikipedia_api_url)?;
        validate_url("ARXIV_API_URL", &search.arxiv_api_url)?;

        let max_iterations = parse_positive(&lookup, "MAX_ITERATIONS", 15)?;
        let timeout_secs: u64 = parse_positive(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 8501)?;

        Ok(Self {
            provider,
            retrieval,
            search,
            max_iterations,
            request_timeout: Duration::from_secs(timeout_secs),
            host,
            port,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, source_url: String) -> Self {
        Self {
            provider: ProviderConfig {
                api_key,
                base_url: "https://api.openai.com/v1".to_string(),
                chat_model: "gpt-3.5-turbo-0125".to_string(),
                temperature: 0.0,
                embedding_model: "text-embedding-ada-002".to_string(),
                embedding_batch_size: 64,
            },
            retrieval: RetrievalConfig {
                source_url,
                ..RetrievalConfig::default()
            },
            search: SearchConfig::default(),
            max_iterations: 15,
            request_timeout: Duration::from_secs(30),
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}

/// Like `parse_or`, but zero is rejected.
fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = parse_or(lookup, key, default)?;
    if value == T::default() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e)))
}
